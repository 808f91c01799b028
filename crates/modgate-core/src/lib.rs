//! ModGate Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Model runtimes
//!
//! All types here represent the moderation domain: tasks, their records,
//! and the verdicts produced by the classification pipeline.

pub mod error;
pub mod ids;
pub mod result;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::TaskId;
pub use result::{ClassificationResult, Stage, StageTimings};
pub use status::TaskStatus;
pub use task::{validate_filename, Task, TaskRecord};
