//! Database row models for the `connection` and `backup` tables.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Backup, BackupEntry, BackupId, Connection, ConnectionId};

/// A row from the `connection` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConnectionRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Opaque connection string.
    pub connection_string: String,
    /// Default schema.
    pub schema: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_active: bool,
}

impl From<ConnectionRow> for Connection {
    fn from(row: ConnectionRow) -> Self {
        Self {
            id: ConnectionId::from_uuid(row.id),
            name: row.name,
            connection_string: row.connection_string,
            schema: row.schema,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_active: row.is_active,
        }
    }
}

/// A row from `backup` joined with the owning connection's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BackupRow {
    /// Primary key.
    pub id: Uuid,
    /// Referenced connection.
    pub connection_id: Uuid,
    /// Artifact name.
    pub filename: String,
    /// Artifact location.
    pub filepath: String,
    /// Artifact size in megabytes.
    pub size_mb: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// `connection.name` via `LEFT JOIN`; `NULL` if unresolved.
    pub connection_name: Option<String>,
}

impl From<BackupRow> for BackupEntry {
    fn from(row: BackupRow) -> Self {
        Self {
            backup: Backup {
                id: BackupId::from_uuid(row.id),
                connection_id: ConnectionId::from_uuid(row.connection_id),
                filename: row.filename,
                filepath: row.filepath,
                size_mb: row.size_mb,
                created_at: row.created_at,
            },
            connection_name: row.connection_name,
        }
    }
}
