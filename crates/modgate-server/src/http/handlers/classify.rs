//! Task submission handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use modgate_core::{validate_filename, Task, TaskStatus};

use crate::http::responses::{ClassifyRequest, ClassifyResponse, ErrorResponse};
use crate::state::AppState;

/// Admit an image for classification.
///
/// POST /classify
pub async fn submit_classification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected malformed submission");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let filename = match validate_filename(request.filename.as_deref().unwrap_or_default()) {
        Ok(name) => name.to_string(),
        Err(e) => {
            warn!(error = %e, "Rejected submission");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.queue.submit(Task::new(filename.clone())).await {
        Ok(task_id) => {
            info!(task_id = %task_id, filename = %filename, "Task queued");
            (
                StatusCode::ACCEPTED,
                Json(ClassifyResponse {
                    task_id,
                    status: TaskStatus::Queued,
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(filename = %filename, error = %e, "Task not admitted");
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
