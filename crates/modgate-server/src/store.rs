//! In-memory result store.
//!
//! Maps task ids to their terminal [`TaskRecord`]. Each id is written at most
//! once, by the worker that owns the task, and read any number of times.
//! Records are kept for the lifetime of the process.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use modgate_core::{TaskId, TaskRecord, TaskStatus};

/// Result store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record already written for task: {0}")]
    AlreadyWritten(TaskId),
}

/// Shared task-id to record mapping.
#[derive(Default)]
pub struct ResultStore {
    records: RwLock<HashMap<TaskId, TaskRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the terminal record for a task. A second write for the same id is rejected.
    pub async fn put(&self, record: TaskRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.task_id) {
            return Err(StoreError::AlreadyWritten(record.task_id));
        }
        records.insert(record.task_id.clone(), record);
        Ok(())
    }

    /// Read the record for a task; `None` if nothing was written for it.
    pub async fn get(&self, task_id: &TaskId) -> Option<TaskRecord> {
        self.records.read().await.get(task_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of records with the given status.
    pub async fn count_by_status(&self, status: TaskStatus) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.status == status)
            .count()
    }
}
