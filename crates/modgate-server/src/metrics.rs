//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use modgate_core::TaskStatus;

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_task_metrics(state, &mut output).await;
    collect_queue_metrics(state, &mut output);

    output
}

/// Collect task metrics by status.
///
/// `pending` covers every admitted task without a record yet, whether it is
/// still waiting in the queue or already held by a worker.
async fn collect_task_metrics(state: &Arc<AppState>, output: &mut String) {
    let pending = state.queue.pending_count().await;
    let completed = state.results.count_by_status(TaskStatus::Completed).await;
    let error = state.results.count_by_status(TaskStatus::Error).await;

    writeln!(
        output,
        "# HELP modgate_tasks_total Number of tasks by status (pending includes running)"
    )
    .ok();
    writeln!(output, "# TYPE modgate_tasks_total gauge").ok();
    writeln!(output, "modgate_tasks_total{{status=\"pending\"}} {pending}").ok();
    writeln!(
        output,
        "modgate_tasks_total{{status=\"completed\"}} {completed}"
    )
    .ok();
    writeln!(output, "modgate_tasks_total{{status=\"error\"}} {error}").ok();
}

/// Collect queue depth and worker pool size.
fn collect_queue_metrics(state: &AppState, output: &mut String) {
    writeln!(output).ok();
    writeln!(
        output,
        "# HELP modgate_queue_depth Number of tasks waiting to be claimed"
    )
    .ok();
    writeln!(output, "# TYPE modgate_queue_depth gauge").ok();
    writeln!(output, "modgate_queue_depth {}", state.queue.len()).ok();

    writeln!(output).ok();
    writeln!(output, "# HELP modgate_workers Number of classification workers").ok();
    writeln!(output, "# TYPE modgate_workers gauge").ok();
    writeln!(output, "modgate_workers {}", state.worker_count).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::TaskQueue;
    use modgate_core::{Task, TaskRecord};

    #[tokio::test]
    async fn test_collect_metrics_empty_state() {
        let state = AppState::new("/data/input", TaskQueue::new(4), 2);
        let output = collect_metrics(&state).await;

        assert!(output.contains("modgate_tasks_total{status=\"pending\"} 0"));
        assert!(output.contains("modgate_tasks_total{status=\"completed\"} 0"));
        assert!(output.contains("modgate_queue_depth 0"));
        assert!(output.contains("modgate_workers 2"));
    }

    #[tokio::test]
    async fn test_collect_metrics_counts_tasks() {
        let state = AppState::new("/data/input", TaskQueue::new(4), 1);
        state.queue.submit(Task::new("a.jpg")).await.unwrap();
        state
            .results
            .put(TaskRecord::failed(&Task::new("b.jpg"), "File not found"))
            .await
            .unwrap();

        let output = collect_metrics(&state).await;
        assert!(output.contains("modgate_tasks_total{status=\"pending\"} 1"));
        assert!(output.contains("modgate_tasks_total{status=\"error\"} 1"));
        assert!(output.contains("modgate_queue_depth 1"));
    }

    #[tokio::test]
    async fn test_claimed_task_is_pending_but_not_queued() {
        let state = AppState::new("/data/input", TaskQueue::new(4), 1);
        state.queue.submit(Task::new("a.jpg")).await.unwrap();
        state.queue.claim().await.unwrap();

        let output = collect_metrics(&state).await;
        assert!(output.contains("modgate_tasks_total{status=\"pending\"} 1"));
        assert!(output.contains("modgate_queue_depth 0"));
    }
}
