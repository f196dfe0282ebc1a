//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    BackupDto, ConnectionDto, CreateBackupRequest, CreateConnectionRequest, MessageResponse,
    TablesResponse, UpdateConnectionRequest,
};
use super::handlers::{backup, connection, system};
use crate::domain::FieldIssue;
use crate::error::{ErrorBody, ErrorResponse};

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Aggregated OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "dbvault",
        description = "Registry of database connection profiles and backup metadata."
    ),
    paths(
        connection::list_connections,
        connection::create_connection,
        connection::get_connection,
        connection::update_connection,
        connection::delete_connection,
        connection::list_tables,
        backup::list_backups,
        backup::create_backup,
        system::health_handler,
    ),
    components(schemas(
        ConnectionDto,
        CreateConnectionRequest,
        UpdateConnectionRequest,
        BackupDto,
        CreateBackupRequest,
        MessageResponse,
        TablesResponse,
        ErrorResponse,
        ErrorBody,
        FieldIssue,
        system::HealthResponse,
    )),
    tags(
        (name = "Connections", description = "Connection profile management"),
        (name = "Backups", description = "Backup metadata ledger"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
