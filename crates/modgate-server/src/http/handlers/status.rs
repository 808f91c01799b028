//! Task status handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use modgate_core::{TaskId, TaskStatus};

use crate::http::responses::{NotFoundResponse, QueuedResponse};
use crate::state::AppState;

/// Get the status of a task.
///
/// GET /status/:task_id
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Response {
    let task_id = TaskId::from(task_id);

    // The record is written before the pending entry is dropped, so checking
    // the store first never misses a finishing task.
    if let Some(record) = state.results.get(&task_id).await {
        return (StatusCode::OK, Json(record)).into_response();
    }

    if state.queue.is_pending(&task_id).await {
        return (
            StatusCode::OK,
            Json(QueuedResponse {
                task_id,
                status: TaskStatus::Queued,
            }),
        )
            .into_response();
    }

    (StatusCode::NOT_FOUND, Json(NotFoundResponse::default())).into_response()
}
