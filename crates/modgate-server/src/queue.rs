//! FIFO task queue shared by the HTTP front and the worker pool.
//!
//! Admission never blocks: a full queue rejects the task instead. Workers
//! claim tasks one at a time in submission order. Admitted ids stay in the
//! pending set until their worker has written the terminal record, so status
//! reads can tell "queued" apart from "unknown".

use std::collections::HashSet;

use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::debug;

use modgate_core::{Task, TaskId};

/// Queue errors.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Task queue is full (capacity {0})")]
    Full(usize),

    #[error("Task queue is closed")]
    Closed,
}

/// Bounded multi-consumer FIFO of tasks.
pub struct TaskQueue {
    tx: mpsc::Sender<Task>,
    rx: Mutex<mpsc::Receiver<Task>>,
    pending: RwLock<HashSet<TaskId>>,
}

impl TaskQueue {
    /// Create a queue holding at most `capacity` unclaimed tasks.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
            pending: RwLock::new(HashSet::new()),
        }
    }

    /// Enqueue a task without waiting.
    pub async fn submit(&self, task: Task) -> Result<TaskId, QueueError> {
        let task_id = task.id.clone();

        // Mark pending first so a fast worker cannot finish before the insert.
        self.pending.write().await.insert(task_id.clone());

        match self.tx.try_send(task) {
            Ok(()) => {
                debug!(task_id = %task_id, depth = self.len(), "Task enqueued");
                Ok(task_id)
            }
            Err(e) => {
                self.pending.write().await.remove(&task_id);
                match e {
                    TrySendError::Full(_) => Err(QueueError::Full(self.capacity())),
                    TrySendError::Closed(_) => Err(QueueError::Closed),
                }
            }
        }
    }

    /// Wait for the next task in submission order.
    ///
    /// Cancel-safe: dropping the future never loses a task.
    pub async fn claim(&self) -> Option<Task> {
        self.rx.lock().await.recv().await
    }

    /// Forget a task once its terminal record has been written.
    pub async fn finish(&self, task_id: &TaskId) {
        self.pending.write().await.remove(task_id);
    }

    /// Whether the task was admitted and has no terminal record yet.
    pub async fn is_pending(&self, task_id: &TaskId) -> bool {
        self.pending.read().await.contains(task_id)
    }

    /// Admitted tasks without a terminal record, claimed or not.
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    /// Number of tasks waiting to be claimed.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claims_in_submission_order() {
        let queue = TaskQueue::new(8);
        let mut ids = Vec::new();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            ids.push(queue.submit(Task::new(name)).await.unwrap());
        }
        assert_eq!(queue.len(), 3);

        for expected in ids {
            let task = queue.claim().await.unwrap();
            assert_eq!(task.id, expected);
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_rejects_without_pending_entry() {
        let queue = TaskQueue::new(1);
        queue.submit(Task::new("a.jpg")).await.unwrap();

        let rejected = Task::new("b.jpg");
        let rejected_id = rejected.id.clone();
        let err = queue.submit(rejected).await.unwrap_err();

        assert!(matches!(err, QueueError::Full(1)));
        assert!(!queue.is_pending(&rejected_id).await);
        assert_eq!(queue.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_pending_until_finished() {
        let queue = TaskQueue::new(4);
        let id = queue.submit(Task::new("a.jpg")).await.unwrap();
        assert!(queue.is_pending(&id).await);

        let task = queue.claim().await.unwrap();
        assert!(queue.is_pending(&task.id).await);

        queue.finish(&task.id).await;
        assert!(!queue.is_pending(&id).await);
    }
}
