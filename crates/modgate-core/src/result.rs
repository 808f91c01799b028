//! Classification verdicts and per-stage timing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A timed step of the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preprocessing,
    TagGeneration,
    BlacklistCheck,
    NsfwDetection,
    ProfanityCheck,
    TotalProcessing,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 6] = [
        Stage::Preprocessing,
        Stage::TagGeneration,
        Stage::BlacklistCheck,
        Stage::NsfwDetection,
        Stage::ProfanityCheck,
        Stage::TotalProcessing,
    ];

    /// Key under which the stage duration is recorded.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preprocessing => "preprocessing",
            Self::TagGeneration => "tag_generation",
            Self::BlacklistCheck => "blacklist_check",
            Self::NsfwDetection => "nsfw_detection",
            Self::ProfanityCheck => "profanity_check",
            Self::TotalProcessing => "total_processing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage durations in seconds, keyed by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTimings(BTreeMap<Stage, f64>);

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the duration of a stage, replacing any earlier value.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.0.insert(stage, elapsed.as_secs_f64());
    }

    /// Record a stage that was skipped.
    pub fn skip(&mut self, stage: Stage) {
        self.0.insert(stage, 0.0);
    }

    /// Duration of a stage in seconds, if recorded.
    pub fn get(&self, stage: Stage) -> Option<f64> {
        self.0.get(&stage).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        self.0.iter().map(|(stage, secs)| (*stage, *secs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Moderation verdict for a single image.
///
/// When the verdict comes from a blacklist hit, `is_adult` is always true and
/// `confidence_score` is always `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Deduplicated, lower-cased descriptive tags.
    pub tags: Vec<String>,

    /// Adult-content verdict.
    pub is_adult: bool,

    /// Confidence of the verdict in [0, 1].
    pub confidence_score: f64,

    /// Whether any profane token was found in the tags.
    pub profanity_detected: bool,

    /// Binary profanity score: 1.0 if detected, else 0.0.
    pub profanity_score: f64,

    /// Total processing time in seconds.
    pub processing_time: f64,

    /// Per-stage processing times in seconds.
    pub timing_info: StageTimings,

    /// Human-readable explanation of the adult-content verdict.
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_keys_match_serde() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }

    #[test]
    fn test_timings_serialize_as_map() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Preprocessing, Duration::from_millis(250));
        timings.skip(Stage::NsfwDetection);

        let value = serde_json::to_value(&timings).unwrap();
        assert_eq!(value["preprocessing"], 0.25);
        assert_eq!(value["nsfw_detection"], 0.0);
        assert_eq!(timings.len(), 2);
    }

    #[test]
    fn test_skip_overrides_recorded_duration() {
        let mut timings = StageTimings::new();
        timings.record(Stage::NsfwDetection, Duration::from_secs(3));
        timings.skip(Stage::NsfwDetection);
        assert_eq!(timings.get(Stage::NsfwDetection), Some(0.0));
    }
}
