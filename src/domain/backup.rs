//! Backup records: the append-only ledger entries.
//!
//! A [`Backup`] describes where a (conceptual) dump artifact lives. The
//! registry never runs a dump itself, so `size_mb` stays at zero until an
//! external process reports a size.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{FieldIssue, require};
use super::{BackupId, ConnectionId};

/// Directory used for artifact paths when none is configured.
pub const DEFAULT_BACKUP_DIR: &str = "/backups";

/// Maximum length of [`Backup::filepath`], in characters.
pub const FILEPATH_MAX_CHARS: usize = 500;

/// Length of every name produced by [`artifact_filename`].
const ARTIFACT_FILENAME_CHARS: usize = "backup_YYYYMMDD_HHMMSS.sql".len();

/// Longest backup directory whose artifact paths still fit in
/// [`FILEPATH_MAX_CHARS`]. Trailing separators are not counted.
pub const BACKUP_DIR_MAX_CHARS: usize = FILEPATH_MAX_CHARS - ARTIFACT_FILENAME_CHARS - 1;

/// A record of one backup taken against a [`super::Connection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Unique identifier.
    pub id: BackupId,
    /// Connection the backup was taken from. Validated only at creation.
    pub connection_id: ConnectionId,
    /// Logical artifact name, e.g. `backup_20240131_235959.sql`.
    pub filename: String,
    /// Storage location of the artifact.
    pub filepath: String,
    /// Artifact size in megabytes.
    pub size_mb: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Backup {
    /// Records a new backup for `connection_id` at instant `now`.
    ///
    /// The filename, the path and `created_at` all derive from the same
    /// instant, so they can never disagree.
    #[must_use]
    pub fn record(connection_id: ConnectionId, backup_dir: &str, now: DateTime<Utc>) -> Self {
        let filename = artifact_filename(now);
        let filepath = artifact_path(backup_dir, &filename);
        Self {
            id: BackupId::new(),
            connection_id,
            filename,
            filepath,
            size_mb: 0.0,
            created_at: now,
        }
    }
}

/// A backup as presented to readers, with the owning connection's name
/// resolved at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupEntry {
    /// The stored record.
    pub backup: Backup,
    /// Current name of the referenced connection, `None` if it cannot be
    /// resolved.
    pub connection_name: Option<String>,
}

/// Unvalidated backup request.
#[derive(Debug, Clone, Default)]
pub struct NewBackup {
    /// Textual identifier of the connection to back up.
    pub connection_id: Option<String>,
}

impl NewBackup {
    /// Resolves the request into a typed connection identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldIssue`] list when `connection_id` is absent, blank
    /// or not a valid identifier.
    pub fn validate(self) -> Result<ConnectionId, Vec<FieldIssue>> {
        let mut issues = Vec::new();
        let raw = require(
            "connection_id",
            self.connection_id.filter(|s| !s.trim().is_empty()),
            &mut issues,
        );
        let Some(raw) = raw else {
            return Err(issues);
        };
        ConnectionId::parse(&raw).ok_or_else(|| {
            vec![FieldIssue::new(
                "connection_id",
                "connection_id must be a valid identifier",
            )]
        })
    }
}

/// `backup_YYYYMMDD_HHMMSS.sql` for the given instant.
#[must_use]
pub fn artifact_filename(at: DateTime<Utc>) -> String {
    format!("backup_{}.sql", at.format("%Y%m%d_%H%M%S"))
}

/// Joins `filename` under `dir` with exactly one separator.
#[must_use]
pub fn artifact_path(dir: &str, filename: &str) -> String {
    format!("{}/{filename}", artifact_dir(dir))
}

/// `dir` without trailing separators, as it appears in artifact paths.
#[must_use]
pub fn artifact_dir(dir: &str) -> &str {
    dir.trim_end_matches('/')
}
