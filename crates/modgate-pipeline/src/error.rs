//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised inside a single classifier stage.
///
/// These never escape the [`ClassifierAdapter`](crate::ClassifierAdapter);
/// each stage replaces them with its safe default.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Transport-level failure talking to the model server.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model server answered with a non-success status.
    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Image could not be encoded for transfer.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Profanity word list could not be read.
    #[error("failed to read word list {path}: {source}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other model-side failure.
    #[error("model error: {0}")]
    Model(String),
}

/// Errors that abort the whole pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The image file could not be opened or its header read.
    #[error("failed to read image {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image contents could not be decoded.
    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
