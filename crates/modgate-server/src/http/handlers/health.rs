//! Health and metrics handlers.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::http::responses::{FolderListing, HealthResponse};
use crate::state::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        queue_size: state.queue.len(),
        pending_tasks: state.queue.pending_count().await,
        workers: state.worker_count,
        input_folder: state.input_folder.display().to_string(),
        files_in_folder: list_files(&state.input_folder).await,
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = crate::metrics::collect_metrics(&state).await;
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

async fn list_files(folder: &Path) -> FolderListing {
    let Ok(mut entries) = tokio::fs::read_dir(folder).await else {
        return FolderListing::Missing("Folder not found");
    };

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    FolderListing::Files(names)
}
