//! Connection handlers: list, create, get, update, soft-delete, tables.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    ConnectionDto, CreateConnectionRequest, MessageResponse, TablesResponse,
    UpdateConnectionRequest,
};
use crate::app_state::AppState;
use crate::domain::ConnectionId;
use crate::error::{ErrorResponse, RegistryError};

/// `GET /connections` — List active connections.
///
/// # Errors
///
/// Returns [`RegistryError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/connections",
    tag = "Connections",
    summary = "List active connections",
    description = "Returns every connection that has not been soft-deleted, in creation order.",
    responses(
        (status = 200, description = "Active connections", body = Vec<ConnectionDto>),
    )
)]
pub async fn list_connections(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RegistryError> {
    let connections = state.connections.list_active().await?;
    let body: Vec<ConnectionDto> = connections.into_iter().map(ConnectionDto::from).collect();
    Ok(Json(body))
}

/// `POST /connections` — Create a connection profile.
///
/// # Errors
///
/// Returns [`RegistryError`] on missing fields or a duplicate name.
#[utoipa::path(
    post,
    path = "/api/connections",
    tag = "Connections",
    summary = "Create a connection",
    description = "Registers a named connection profile. Names are unique across active and soft-deleted connections.",
    request_body = CreateConnectionRequest,
    responses(
        (status = 201, description = "Connection created", body = ConnectionDto),
        (status = 400, description = "Missing fields or duplicate name", body = ErrorResponse),
    )
)]
pub async fn create_connection(
    State(state): State<AppState>,
    payload: Result<Json<CreateConnectionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RegistryError> {
    let Json(req) = payload?;
    let connection = state.connections.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ConnectionDto::from(connection))))
}

/// `GET /connections/{id}` — Fetch one connection, active or not.
///
/// # Errors
///
/// Returns [`RegistryError::ConnectionNotFound`] if the id does not resolve.
#[utoipa::path(
    get,
    path = "/api/connections/{id}",
    tag = "Connections",
    summary = "Get a connection",
    description = "Returns a connection by id, including soft-deleted ones.",
    params(
        ("id" = String, Path, description = "Connection UUID"),
    ),
    responses(
        (status = 200, description = "Connection", body = ConnectionDto),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn get_connection(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let id = resolve_id(&raw_id)?;
    let connection = state.connections.get(id).await?;
    Ok(Json(ConnectionDto::from(connection)))
}

/// `PUT /connections/{id}` — Partially update a connection.
///
/// # Errors
///
/// Returns [`RegistryError`] on unknown id, malformed fields, or a name
/// already used by another connection.
#[utoipa::path(
    put,
    path = "/api/connections/{id}",
    tag = "Connections",
    summary = "Update a connection",
    description = "Changes only the supplied fields. `updated_at` is refreshed on every call.",
    params(
        ("id" = String, Path, description = "Connection UUID"),
    ),
    request_body = UpdateConnectionRequest,
    responses(
        (status = 200, description = "Updated connection", body = ConnectionDto),
        (status = 400, description = "Invalid fields or duplicate name", body = ErrorResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn update_connection(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateConnectionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RegistryError> {
    let id = resolve_id(&raw_id)?;
    let Json(req) = payload?;
    let connection = state.connections.update(id, req.into()).await?;
    Ok(Json(ConnectionDto::from(connection)))
}

/// `DELETE /connections/{id}` — Soft-delete a connection.
///
/// # Errors
///
/// Returns [`RegistryError::ConnectionNotFound`] if the id does not resolve.
#[utoipa::path(
    delete,
    path = "/api/connections/{id}",
    tag = "Connections",
    summary = "Delete a connection",
    description = "Marks the connection inactive. It stays addressable by id and its backups are kept.",
    params(
        ("id" = String, Path, description = "Connection UUID"),
    ),
    responses(
        (status = 200, description = "Connection deactivated", body = MessageResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn delete_connection(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let id = resolve_id(&raw_id)?;
    state.connections.soft_delete(id).await?;
    Ok(Json(MessageResponse::new("Connection deleted successfully")))
}

/// `GET /connections/{id}/tables` — List tables (always empty).
///
/// # Errors
///
/// Returns [`RegistryError::ConnectionNotFound`] if the id does not resolve.
#[utoipa::path(
    get,
    path = "/api/connections/{id}/tables",
    tag = "Connections",
    summary = "List tables",
    description = "Placeholder: validates the connection and returns an empty table list.",
    params(
        ("id" = String, Path, description = "Connection UUID"),
    ),
    responses(
        (status = 200, description = "Table list", body = TablesResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
    )
)]
pub async fn list_tables(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let id = resolve_id(&raw_id)?;
    let tables = state.connections.list_tables(id).await?;
    Ok(Json(TablesResponse { tables }))
}

/// Connection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/connections", get(list_connections).post(create_connection))
        .route(
            "/connections/{id}",
            get(get_connection)
                .put(update_connection)
                .delete(delete_connection),
        )
        .route("/connections/{id}/tables", get(list_tables))
}

/// An id that is not even well-formed cannot resolve to a connection.
fn resolve_id(raw: &str) -> Result<ConnectionId, RegistryError> {
    ConnectionId::parse(raw).ok_or_else(|| RegistryError::ConnectionNotFound(raw.to_string()))
}
