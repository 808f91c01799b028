//! Worker pool.
//!
//! A fixed number of long-lived workers claim tasks from the shared queue and
//! run them to completion, one at a time. Every claimed task ends in exactly
//! one write to the result store, `completed` or `error`; nothing that happens
//! while processing a task can stop the worker loop.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use modgate_core::{Task, TaskRecord};
use modgate_pipeline::DecisionPipeline;

use crate::datastore::StatusNotifier;
use crate::state::AppState;

/// Everything a worker needs to process tasks. Cheap to clone.
#[derive(Clone)]
pub struct Worker {
    state: Arc<AppState>,
    pipeline: Arc<DecisionPipeline>,
    notifier: Arc<dyn StatusNotifier>,
}

impl Worker {
    pub fn new(
        state: Arc<AppState>,
        pipeline: Arc<DecisionPipeline>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Self {
        Self {
            state,
            pipeline,
            notifier,
        }
    }

    /// Claim and process tasks until shutdown is requested.
    ///
    /// A task already claimed is always finished before the loop exits.
    pub async fn run(self, index: usize, shutdown: CancellationToken) {
        info!(worker = index, "Worker started");
        loop {
            let task = tokio::select! {
                _ = shutdown.cancelled() => break,
                task = self.state.queue.claim() => task,
            };
            let Some(task) = task else { break };

            info!(worker = index, task_id = %task.id, filename = %task.filename, "Task claimed");
            self.handle(task).await;
        }
        info!(worker = index, "Worker stopped");
    }

    /// Process one task and store its terminal record.
    pub async fn handle(&self, task: Task) {
        let record = self.execute(&task).await;
        info!(task_id = %task.id, status = record.status.as_str(), "Task finished");

        if let Err(e) = self.state.results.put(record).await {
            error!(task_id = %task.id, error = %e, "Dropping duplicate task record");
        }
        self.state.queue.finish(&task.id).await;
    }

    async fn execute(&self, task: &Task) -> TaskRecord {
        let path = self.state.input_folder.join(&task.filename);

        if !file_exists(&path).await {
            warn!(task_id = %task.id, path = %path.display(), "Input file not found");
            return TaskRecord::failed(task, format!("File not found: {}", path.display()));
        }

        let pipeline = self.pipeline.clone();
        let classified = tokio::task::spawn_blocking(move || pipeline.classify(&path)).await;

        match classified {
            Ok(Ok(result)) => {
                if let Err(e) = self
                    .notifier
                    .update_moderation_status(&task.filename, result.is_adult)
                    .await
                {
                    error!(
                        task_id = %task.id,
                        filename = %task.filename,
                        error = %e,
                        "Datastore update failed"
                    );
                }
                TaskRecord::completed(task, result)
            }
            Ok(Err(e)) => TaskRecord::failed(task, e.to_string()),
            Err(e) => {
                error!(task_id = %task.id, error = %e, "Classification aborted");
                TaskRecord::failed(task, format!("Classification aborted: {e}"))
            }
        }
    }
}

async fn file_exists(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(meta) if meta.is_file())
}

/// Handles of the running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers sharing the same queue.
    pub fn spawn(count: usize, worker: Worker, shutdown: CancellationToken) -> Self {
        let handles = (0..count)
            .map(|index| tokio::spawn(worker.clone().run(index, shutdown.clone())))
            .collect();
        info!(workers = count, "Worker pool started");
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to stop.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Worker terminated abnormally");
            }
        }
    }
}
