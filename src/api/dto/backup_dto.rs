//! Backup DTOs for create and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BackupEntry, BackupId, ConnectionId, NewBackup};

/// Request body for `POST /backups`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBackupRequest {
    /// Identifier of the connection to back up. Required.
    #[serde(default)]
    pub connection_id: Option<String>,
}

impl From<CreateBackupRequest> for NewBackup {
    fn from(req: CreateBackupRequest) -> Self {
        Self {
            connection_id: req.connection_id,
        }
    }
}

/// Backup representation with the connection name resolved at read time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackupDto {
    /// Backup identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: BackupId,
    /// Referenced connection.
    #[schema(value_type = String, format = Uuid)]
    pub connection_id: ConnectionId,
    /// Artifact name.
    pub filename: String,
    /// Artifact location.
    pub filepath: String,
    /// Artifact size in megabytes.
    pub size_mb: f64,
    /// Creation timestamp (ISO-8601).
    pub created_at: DateTime<Utc>,
    /// Current connection name, `null` if it cannot be resolved.
    pub connection_name: Option<String>,
}

impl From<BackupEntry> for BackupDto {
    fn from(entry: BackupEntry) -> Self {
        let BackupEntry {
            backup,
            connection_name,
        } = entry;
        Self {
            id: backup.id,
            connection_id: backup.connection_id,
            filename: backup.filename,
            filepath: backup.filepath,
            size_mb: backup.size_mb,
            created_at: backup.created_at,
            connection_name,
        }
    }
}
