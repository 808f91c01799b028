//! Task and TaskRecord types.

use crate::{ClassificationResult, CoreError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// A Task represents one image awaiting moderation.
///
/// Tasks are immutable once created and are consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Source filename, relative to the configured input folder.
    pub filename: String,
}

impl Task {
    /// Create a new Task for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            filename: filename.into(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }
}

/// Validate a submitted filename.
///
/// The name must be non-empty and stay inside the input folder: relative,
/// with no `..`, root or prefix components. Returns the trimmed name.
pub fn validate_filename(raw: &str) -> Result<&str, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput("filename is required".to_string()));
    }

    let escapes = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(CoreError::InvalidInput(format!(
            "filename must be relative to the input folder: {name}"
        )));
    }

    Ok(name)
}

/// Terminal outcome of a Task, as kept in the result store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task this record belongs to.
    pub task_id: TaskId,

    /// Source filename of the task.
    pub filename: String,

    /// Terminal status: `completed` or `error`.
    pub status: TaskStatus,

    /// Verdict, present when completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationResult>,

    /// Failure message, present on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the record was written.
    pub timestamp: DateTime<Utc>,
}

impl TaskRecord {
    /// Record for a task that produced a verdict.
    pub fn completed(task: &Task, result: ClassificationResult) -> Self {
        Self {
            task_id: task.id.clone(),
            filename: task.filename.clone(),
            status: TaskStatus::Completed,
            result: Some(result),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Record for a task that failed.
    pub fn failed(task: &Task, error: impl Into<String>) -> Self {
        Self {
            task_id: task.id.clone(),
            filename: task.filename.clone(),
            status: TaskStatus::Error,
            result: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StageTimings;

    fn verdict() -> ClassificationResult {
        ClassificationResult {
            tags: vec!["cat".to_string()],
            is_adult: false,
            confidence_score: 0.1,
            profanity_detected: false,
            profanity_score: 0.0,
            processing_time: 0.5,
            timing_info: StageTimings::new(),
            reason: Some("classification model".to_string()),
        }
    }

    #[test]
    fn test_validate_filename() {
        assert_eq!(validate_filename(" cat.jpg ").unwrap(), "cat.jpg");
        assert_eq!(validate_filename("2024/05/cat.jpg").unwrap(), "2024/05/cat.jpg");
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("a/../../b.jpg").is_err());
        assert!(validate_filename("/etc/passwd").is_err());
    }

    #[test]
    fn test_completed_record() {
        let task = Task::new("cat.jpg");
        let record = TaskRecord::completed(&task, verdict());
        assert_eq!(record.task_id, task.id);
        assert_eq!(record.status, TaskStatus::Completed);
        assert!(record.error.is_none());
        assert!(record.result.is_some());
    }

    #[test]
    fn test_failed_record_omits_result_on_the_wire() {
        let task = Task::new("missing.jpg").with_id(TaskId::new("t-1"));
        let record = TaskRecord::failed(&task, "File not found: /data/input/missing.jpg");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["task_id"], "t-1");
        assert!(value.get("result").is_none());
        assert!(value["error"].as_str().unwrap().contains("missing.jpg"));
    }
}
