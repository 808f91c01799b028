//! Task status.

use serde::{Deserialize, Serialize};

/// Status of a moderation Task.
///
/// `Queued` is never stored in the result store; it only describes a task
/// that has been admitted and has not yet reached a terminal record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task admitted and waiting for (or running on) a worker.
    #[default]
    Queued,
    /// Classification finished and a verdict is available.
    Completed,
    /// Task could not be classified.
    Error,
}

impl TaskStatus {
    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}
