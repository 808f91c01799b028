//! Classifier adapter.
//!
//! The captioning model, the NSFW classifier and the profanity matcher are
//! external collaborators. Each is consumed through a small synchronous trait,
//! and [`ClassifierAdapter`] turns them into three independently timed stages.
//!
//! Every stage fails open: an error from the underlying model is logged and
//! replaced with the stage's safe default (no tags, not adult, no profanity).
//! Only the stage is degraded, never the whole task.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use serde::Deserialize;
use tracing::warn;

use crate::error::ClassifierError;
use crate::text::words;

/// Scores strictly above this value are classified as adult content.
pub const NSFW_THRESHOLD: f64 = 0.4;

/// Tags must be longer than this many characters.
const MIN_TAG_CHARS: usize = 2;

/// Produces a free-text caption describing an image.
pub trait Captioner: Send + Sync {
    fn caption(&self, image: &RgbImage) -> Result<String, ClassifierError>;
}

/// One label/score pair from an image classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Scores an image against a set of labels, at least one of which names NSFW content.
pub trait NsfwModel: Send + Sync {
    fn predict(&self, image: &RgbImage) -> Result<Vec<LabelScore>, ClassifierError>;
}

/// Detects profane words in text.
pub trait ProfanityMatcher: Send + Sync {
    fn contains_profanity(&self, text: &str) -> Result<bool, ClassifierError>;
}

/// A stage output together with how long the stage took.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    fn since(value: T, started: Instant) -> Self {
        Self {
            value,
            elapsed: started.elapsed(),
        }
    }
}

/// Output of the NSFW stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NsfwVerdict {
    pub is_adult: bool,
    pub score: f64,
}

impl NsfwVerdict {
    /// Apply the fixed threshold to a score.
    pub fn from_score(score: f64) -> Self {
        Self {
            is_adult: score > NSFW_THRESHOLD,
            score,
        }
    }

    /// Default used when the model fails.
    pub fn safe() -> Self {
        Self {
            is_adult: false,
            score: 0.0,
        }
    }
}

/// Output of the profanity stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfanityVerdict {
    pub detected: bool,
    pub score: f64,
}

impl ProfanityVerdict {
    pub fn from_match(detected: bool) -> Self {
        Self {
            detected,
            score: if detected { 1.0 } else { 0.0 },
        }
    }

    pub fn clean() -> Self {
        Self::from_match(false)
    }
}

/// Uniform, fail-open access to the external classifiers.
///
/// Cheap to clone; the underlying models are shared read-only.
#[derive(Clone)]
pub struct ClassifierAdapter {
    captioner: Arc<dyn Captioner>,
    nsfw: Arc<dyn NsfwModel>,
    profanity: Arc<dyn ProfanityMatcher>,
}

impl ClassifierAdapter {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        nsfw: Arc<dyn NsfwModel>,
        profanity: Arc<dyn ProfanityMatcher>,
    ) -> Self {
        Self {
            captioner,
            nsfw,
            profanity,
        }
    }

    /// Caption the image and turn the caption into tags.
    pub fn generate_tags(&self, image: &RgbImage) -> Timed<Vec<String>> {
        let started = Instant::now();
        let tags = match self.captioner.caption(image) {
            Ok(caption) => extract_tags(&caption),
            Err(e) => {
                warn!(error = %e, "Tag generation failed, continuing without tags");
                Vec::new()
            }
        };
        Timed::since(tags, started)
    }

    /// Score the image with the NSFW model.
    pub fn detect_nsfw(&self, image: &RgbImage) -> Timed<NsfwVerdict> {
        let started = Instant::now();
        let verdict = match self.nsfw.predict(image) {
            Ok(labels) => NsfwVerdict::from_score(nsfw_score(&labels)),
            Err(e) => {
                warn!(error = %e, "NSFW detection failed, assuming safe");
                NsfwVerdict::safe()
            }
        };
        Timed::since(verdict, started)
    }

    /// Check the tags for profanity.
    ///
    /// An empty tag set is clean without consulting the matcher.
    pub fn check_profanity(&self, tags: &[String]) -> Timed<ProfanityVerdict> {
        let started = Instant::now();
        if tags.is_empty() {
            return Timed::since(ProfanityVerdict::clean(), started);
        }

        let text = tags.join(" ");
        let verdict = match self.profanity.contains_profanity(&text) {
            Ok(detected) => ProfanityVerdict::from_match(detected),
            Err(e) => {
                warn!(error = %e, "Profanity check failed, assuming clean");
                ProfanityVerdict::clean()
            }
        };
        Timed::since(verdict, started)
    }
}

/// Lower-case the caption and keep its distinct words longer than two characters.
pub fn extract_tags(caption: &str) -> Vec<String> {
    let lowered = caption.to_lowercase();
    let tags: BTreeSet<&str> = words(&lowered)
        .filter(|w| w.chars().count() > MIN_TAG_CHARS)
        .collect();
    tags.into_iter().map(str::to_owned).collect()
}

/// Highest score among labels naming NSFW content, clamped to [0, 1].
pub fn nsfw_score(labels: &[LabelScore]) -> f64 {
    labels
        .iter()
        .filter(|l| l.label.to_lowercase().contains("nsfw") && l.score.is_finite())
        .map(|l| l.score.clamp(0.0, 1.0))
        .fold(0.0, f64::max)
}
