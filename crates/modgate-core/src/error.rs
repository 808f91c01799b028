//! Core domain errors.

use thiserror::Error;

/// Core domain errors for ModGate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
