//! Content Memory Routes
//!
//! Read-through access to cached analyses plus cleanup and backup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use titanflow::ContentMemoryRepository;

use super::error::{domain_error, ApiError};
use crate::models::{BackupRequest, BackupResponse, CleanupResponse, MemoryEntryResponse};
use crate::AppState;

/// Get a live memory entry
#[utoipa::path(
    get,
    path = "/memory/{video_id}",
    params(
        ("video_id" = String, Path, description = "Video ID the analysis is cached under")
    ),
    responses(
        (status = 200, description = "Entry found", body = MemoryEntryResponse),
        (status = 404, description = "Missing or expired"),
        (status = 500, description = "Storage error")
    ),
    tag = "Memory"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<MemoryEntryResponse>, ApiError> {
    let entry = state
        .memory
        .find_entry(&video_id)
        .await
        .map_err(domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "Memory entry not found".to_string()))?;

    Ok(Json(entry.into()))
}

/// Delete entries older than the retention window
#[utoipa::path(
    post,
    path = "/memory/cleanup",
    responses(
        (status = 200, description = "Expired entries removed", body = CleanupResponse),
        (status = 500, description = "Storage error")
    ),
    tag = "Memory"
)]
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, ApiError> {
    let deleted = state
        .memory
        .cleanup_old_entries()
        .await
        .map_err(domain_error)?;

    Ok(Json(CleanupResponse {
        deleted,
        retention_days: state.memory.config().retention_days,
    }))
}

/// Write a point-in-time copy of the memory store into the backup directory
#[utoipa::path(
    post,
    path = "/memory/backup",
    request_body = BackupRequest,
    responses(
        (status = 200, description = "Backup written", body = BackupResponse),
        (status = 400, description = "File name is not a plain file name"),
        (status = 500, description = "Storage error")
    ),
    tag = "Memory"
)]
pub async fn backup(
    State(state): State<AppState>,
    payload: Option<Json<BackupRequest>>,
) -> Result<Json<BackupResponse>, ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let destination = request
        .resolve(&state.memory.config().backup_location)
        .map_err(domain_error)?;

    let path = state
        .memory
        .backup(&destination)
        .await
        .map_err(domain_error)?;

    Ok(Json(BackupResponse {
        path: path.display().to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/memory/cleanup", post(cleanup))
        .route("/memory/backup", post(backup))
        .route("/memory/:video_id", get(get_entry))
}
