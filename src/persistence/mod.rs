//! Persistence layer: the storage seam behind the registry and ledger.
//!
//! [`RegistryStore`] is the contract both services depend on. Every write
//! method is atomic with respect to its own checks: the name-uniqueness
//! check and the insert/update happen under one lock (in memory) or one
//! transaction (PostgreSQL), and a failed write leaves nothing behind.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Backup, BackupEntry, Connection, ConnectionId, ConnectionPatch};
use crate::error::RegistryError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Storage contract for connections and backups.
#[async_trait]
pub trait RegistryStore: Send + Sync + std::fmt::Debug {
    /// Short backend label for health reporting (e.g. `"postgres"`).
    fn backend(&self) -> &'static str;

    /// Returns active connections in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on storage failure.
    async fn list_active_connections(&self) -> Result<Vec<Connection>, RegistryError>;

    /// Finds a connection by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on storage failure.
    async fn find_connection(&self, id: ConnectionId)
    -> Result<Option<Connection>, RegistryError>;

    /// Stores a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NameConflict`] when any connection, active
    /// or inactive, already uses the same name.
    async fn insert_connection(&self, connection: &Connection) -> Result<(), RegistryError>;

    /// Applies `patch` to the stored connection and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] for an unknown id and
    /// [`RegistryError::NameConflict`] when the new name belongs to a
    /// different connection.
    async fn update_connection(
        &self,
        id: ConnectionId,
        patch: &ConnectionPatch,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError>;

    /// Soft-deletes a connection and returns its new state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] for an unknown id.
    async fn deactivate_connection(
        &self,
        id: ConnectionId,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError>;

    /// Appends a backup record and returns it with the connection name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] when the referenced
    /// connection does not exist.
    async fn insert_backup(&self, backup: &Backup) -> Result<BackupEntry, RegistryError>;

    /// Returns every backup in insertion order, with connection names
    /// resolved at read time.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on storage failure.
    async fn list_backups(&self) -> Result<Vec<BackupEntry>, RegistryError>;
}
