//! Backup ledger: append-only records of backups taken per connection.

use std::sync::Arc;

use crate::domain::{Backup, BackupEntry, NewBackup, clock};
use crate::error::RegistryError;
use crate::persistence::RegistryStore;

/// Records and lists backup metadata.
///
/// The ledger only reads connections: it resolves a backup's target to
/// validate it and to report its current name. No update or delete
/// operation exists for backups.
#[derive(Debug, Clone)]
pub struct BackupLedger {
    store: Arc<dyn RegistryStore>,
    backup_dir: String,
}

impl BackupLedger {
    /// Creates a ledger over `store`, placing artifact paths under
    /// `backup_dir`.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>, backup_dir: impl Into<String>) -> Self {
        Self {
            store,
            backup_dir: backup_dir.into(),
        }
    }

    /// Directory under which artifact paths are generated.
    #[must_use]
    pub fn backup_dir(&self) -> &str {
        &self.backup_dir
    }

    /// Lists every backup, regardless of its connection's state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on storage failure.
    pub async fn list(&self) -> Result<Vec<BackupEntry>, RegistryError> {
        self.store.list_backups().await
    }

    /// Records a backup against an existing connection.
    ///
    /// Soft-deleted connections are accepted: only existence matters.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if `connection_id` is missing
    /// or malformed, and [`RegistryError::ConnectionNotFound`] if it does
    /// not resolve to any connection.
    pub async fn create(&self, input: NewBackup) -> Result<BackupEntry, RegistryError> {
        let connection_id = input.validate()?;
        let backup = Backup::record(connection_id, &self.backup_dir, clock::now());

        let entry = self
            .store
            .insert_backup(&backup)
            .await
            .inspect_err(|err| {
                tracing::warn!(%connection_id, error = %err, "backup rejected");
            })?;

        tracing::info!(
            id = %entry.backup.id,
            %connection_id,
            filepath = %entry.backup.filepath,
            "backup recorded"
        );
        Ok(entry)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionChanges, ConnectionId, NewConnection};
    use crate::persistence::InMemoryStore;
    use crate::service::ConnectionRegistry;

    fn make_services() -> (ConnectionRegistry, BackupLedger) {
        let store: Arc<dyn RegistryStore> = Arc::new(InMemoryStore::new());
        (
            ConnectionRegistry::new(Arc::clone(&store)),
            BackupLedger::new(store, "/backups"),
        )
    }

    async fn connection(registry: &ConnectionRegistry, name: &str) -> ConnectionId {
        let input = NewConnection {
            name: Some(name.to_string()),
            connection_string: Some("postgres://x".to_string()),
            schema: None,
        };
        tokio_test::assert_ok!(registry.create(input).await).id
    }

    fn request(id: ConnectionId) -> NewBackup {
        NewBackup {
            connection_id: Some(id.to_string()),
        }
    }

    #[tokio::test]
    async fn create_fills_artifact_fields() {
        let (registry, ledger) = make_services();
        let id = connection(&registry, "db1").await;

        let entry = tokio_test::assert_ok!(ledger.create(request(id)).await);
        assert_eq!(entry.backup.connection_id, id);
        assert_eq!(entry.connection_name.as_deref(), Some("db1"));
        assert!(entry.backup.filename.starts_with("backup_"));
        assert_eq!(ledger.backup_dir(), "/backups");
        assert_eq!(
            entry.backup.filepath,
            format!("{}/{}", ledger.backup_dir(), entry.backup.filename)
        );
        assert!(entry.backup.size_mb.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn create_for_unknown_connection_is_not_found() {
        let (_, ledger) = make_services();
        let result = ledger.create(request(ConnectionId::new())).await;
        assert!(matches!(result, Err(RegistryError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn create_without_connection_id_is_invalid() {
        let (_, ledger) = make_services();
        let result = ledger.create(NewBackup::default()).await;
        assert!(matches!(result, Err(RegistryError::Validation(_))));
    }

    #[tokio::test]
    async fn soft_deleted_connection_still_accepts_backups() {
        let (registry, ledger) = make_services();
        let id = connection(&registry, "db1").await;
        tokio_test::assert_ok!(registry.soft_delete(id).await);

        let entry = tokio_test::assert_ok!(ledger.create(request(id)).await);
        assert_eq!(entry.connection_name.as_deref(), Some("db1"));
    }

    #[tokio::test]
    async fn list_reflects_current_connection_names() {
        let (registry, ledger) = make_services();
        let c1 = connection(&registry, "c1").await;
        let c2 = connection(&registry, "c2").await;
        let b1 = tokio_test::assert_ok!(ledger.create(request(c1)).await);
        let b2 = tokio_test::assert_ok!(ledger.create(request(c2)).await);

        let rename = ConnectionChanges {
            name: Some("c1-renamed".to_string()),
            ..ConnectionChanges::default()
        };
        tokio_test::assert_ok!(registry.update(c1, rename).await);

        let entries = tokio_test::assert_ok!(ledger.list().await);
        let ids: Vec<_> = entries.iter().map(|e| e.backup.id).collect();
        assert_eq!(ids, vec![b1.backup.id, b2.backup.id]);

        let names: Vec<Option<&str>> = entries
            .iter()
            .map(|e| e.connection_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("c1-renamed"), Some("c2")]);
    }
}
