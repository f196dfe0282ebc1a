//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::RegistryStore;
use crate::service::{BackupLedger, ConnectionRegistry};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection profile operations.
    pub connections: Arc<ConnectionRegistry>,
    /// Backup record operations.
    pub backups: Arc<BackupLedger>,
}

impl AppState {
    /// Wires both services over one store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, backup_dir: impl Into<String>) -> Self {
        Self {
            connections: Arc::new(ConnectionRegistry::new(Arc::clone(&store))),
            backups: Arc::new(BackupLedger::new(store, backup_dir)),
        }
    }

    /// Label of the storage backend in use.
    #[must_use]
    pub fn storage_backend(&self) -> &'static str {
        self.connections.store().backend()
    }
}
