//! HTTP request and response types.

use serde::{Deserialize, Serialize};

use modgate_core::{TaskId, TaskStatus};

// ============================================================================
// Classification types
// ============================================================================

/// Request body for the classify endpoint.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Image filename, relative to the input folder.
    pub filename: Option<String>,
}

/// Response body for an accepted submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

// ============================================================================
// Status types
// ============================================================================

/// Status of a task that has no terminal record yet.
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// Status of an unknown task.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub status: &'static str,
}

impl Default for NotFoundResponse {
    fn default() -> Self {
        Self {
            status: "not_found",
        }
    }
}

// ============================================================================
// Health types
// ============================================================================

/// Response for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue_size: usize,
    pub pending_tasks: usize,
    pub workers: usize,
    pub input_folder: String,
    pub files_in_folder: FolderListing,
}

/// Files in the input folder, or a marker when the folder is missing.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FolderListing {
    Files(Vec<String>),
    Missing(&'static str),
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
