//! Backup handlers: list and create.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{BackupDto, CreateBackupRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RegistryError};

/// `GET /backups` — List every backup record.
///
/// # Errors
///
/// Returns [`RegistryError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/backups",
    tag = "Backups",
    summary = "List backups",
    description = "Returns all backup records in creation order. `connection_name` reflects the connection's current name.",
    responses(
        (status = 200, description = "Backup records", body = Vec<BackupDto>),
    )
)]
pub async fn list_backups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RegistryError> {
    let entries = state.backups.list().await?;
    let body: Vec<BackupDto> = entries.into_iter().map(BackupDto::from).collect();
    Ok(Json(body))
}

/// `POST /backups` — Record a backup for a connection.
///
/// # Errors
///
/// Returns [`RegistryError`] when `connection_id` is missing, malformed,
/// or unknown.
#[utoipa::path(
    post,
    path = "/api/backups",
    tag = "Backups",
    summary = "Record a backup",
    description = "Creates a backup record whose filename and path derive from the current time. No dump is executed.",
    request_body = CreateBackupRequest,
    responses(
        (status = 201, description = "Backup recorded", body = BackupDto),
        (status = 400, description = "Missing or malformed connection_id", body = ErrorResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn create_backup(
    State(state): State<AppState>,
    payload: Result<Json<CreateBackupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RegistryError> {
    let Json(req) = payload?;
    let entry = state.backups.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(BackupDto::from(entry))))
}

/// Backup routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/backups", get(list_backups).post(create_backup))
}
