//! Moderation decision pipeline.
//!
//! Stages run in a fixed order, each timed individually:
//! 1. preprocessing: decode the image and convert it to RGB
//! 2. tag generation
//! 3. blacklist check over the tags
//! 4. NSFW detection, skipped entirely when the blacklist matched
//! 5. profanity check over the tags, always run
//!
//! A blacklist hit is final: the verdict is adult with confidence 1.0 and the
//! NSFW stage is recorded as taking 0.0 seconds.

use std::path::Path;
use std::time::Instant;

use image::{ImageReader, RgbImage};
use tracing::{error, info};

use modgate_core::{ClassificationResult, Stage, StageTimings};

use crate::adapter::ClassifierAdapter;
use crate::blacklist::Blacklist;
use crate::error::PipelineError;

/// Reason reported when the verdict comes from the NSFW model.
pub const REASON_MODEL: &str = "classification model";

/// Combines classifier outputs into a single verdict.
#[derive(Clone)]
pub struct DecisionPipeline {
    adapter: ClassifierAdapter,
    blacklist: Blacklist,
}

impl DecisionPipeline {
    pub fn new(adapter: ClassifierAdapter, blacklist: Blacklist) -> Self {
        Self { adapter, blacklist }
    }

    /// Classify the image at `image_path`.
    ///
    /// Fails only when the image cannot be decoded; classifier stage failures
    /// degrade that stage to its safe default.
    pub fn classify(&self, image_path: &Path) -> Result<ClassificationResult, PipelineError> {
        let total_started = Instant::now();
        info!(path = %image_path.display(), "Classifying image");

        let mut timings = StageTimings::new();

        let started = Instant::now();
        let image = match preprocess(image_path) {
            Ok(image) => image,
            Err(e) => {
                error!(critical = true, path = %image_path.display(), error = %e, "Image preprocessing failed");
                return Err(e);
            }
        };
        timings.record(Stage::Preprocessing, started.elapsed());

        let tags = self.adapter.generate_tags(&image);
        timings.record(Stage::TagGeneration, tags.elapsed);
        let tags = tags.value;

        let started = Instant::now();
        let forbidden = self.blacklist.check(&tags);
        timings.record(Stage::BlacklistCheck, started.elapsed());

        let (is_adult, confidence_score, reason) = match forbidden {
            Some(word) => {
                timings.skip(Stage::NsfwDetection);
                (true, 1.0, format!("forbidden word detected: {word}"))
            }
            None => {
                let nsfw = self.adapter.detect_nsfw(&image);
                timings.record(Stage::NsfwDetection, nsfw.elapsed);
                (nsfw.value.is_adult, nsfw.value.score, REASON_MODEL.to_string())
            }
        };

        let profanity = self.adapter.check_profanity(&tags);
        timings.record(Stage::ProfanityCheck, profanity.elapsed);

        let total = total_started.elapsed();
        timings.record(Stage::TotalProcessing, total);

        for (stage, secs) in timings.iter() {
            info!(path = %image_path.display(), stage = %stage, secs, "Stage timing");
        }

        Ok(ClassificationResult {
            tags,
            is_adult,
            confidence_score,
            profanity_detected: profanity.value.detected,
            profanity_score: profanity.value.score,
            processing_time: total.as_secs_f64(),
            timing_info: timings,
            reason: Some(reason),
        })
    }
}

/// Decode the image, picking the format from its contents rather than the
/// file extension, and convert it to RGB.
fn preprocess(path: &Path) -> Result<RgbImage, PipelineError> {
    let read_error = |source: std::io::Error| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(read_error)?;

    reader
        .decode()
        .map(|img| img.to_rgb8())
        .map_err(|source| PipelineError::Decode {
            path: path.to_path_buf(),
            source,
        })
}
