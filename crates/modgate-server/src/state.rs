//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::queue::TaskQueue;
use crate::store::ResultStore;

/// State shared by the HTTP handlers and the workers.
pub struct AppState {
    /// Terminal task records.
    pub results: ResultStore,

    /// Admitted, not yet finished tasks.
    pub queue: TaskQueue,

    /// Folder submitted filenames are resolved against.
    pub input_folder: PathBuf,

    /// Size of the worker pool.
    pub worker_count: usize,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(input_folder: impl Into<PathBuf>, queue: TaskQueue, worker_count: usize) -> Arc<Self> {
        Arc::new(Self {
            results: ResultStore::new(),
            queue,
            input_folder: input_folder.into(),
            worker_count,
        })
    }
}
