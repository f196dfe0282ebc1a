//! Connection registry: create, read, update, and soft-delete profiles.

use std::sync::Arc;

use crate::domain::{Connection, ConnectionChanges, ConnectionId, NewConnection, clock};
use crate::error::RegistryError;
use crate::persistence::RegistryStore;

/// Orchestration layer for connection profiles.
///
/// Holds an explicit store handle; validation happens here, atomic
/// uniqueness enforcement happens in the store.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    store: Arc<dyn RegistryStore>,
}

impl ConnectionRegistry {
    /// Creates a registry over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    /// Lists active connections in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on storage failure.
    pub async fn list_active(&self) -> Result<Vec<Connection>, RegistryError> {
        self.store.list_active_connections().await
    }

    /// Creates a new active connection.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] listing every missing or
    /// malformed field, or [`RegistryError::NameConflict`] when the name is
    /// already used by any connection, including soft-deleted ones.
    pub async fn create(&self, input: NewConnection) -> Result<Connection, RegistryError> {
        let draft = input.validate()?;
        let connection = Connection::create(draft, clock::now());

        if let Err(err) = self.store.insert_connection(&connection).await {
            if let RegistryError::NameConflict(name) = &err {
                tracing::warn!(name = %name, "connection name already taken");
            }
            return Err(err);
        }

        tracing::info!(id = %connection.id, name = %connection.name, "connection created");
        Ok(connection)
    }

    /// Fetches a connection by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] if no connection has
    /// this id.
    pub async fn get(&self, id: ConnectionId) -> Result<Connection, RegistryError> {
        self.store
            .find_connection(id)
            .await?
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.to_string()))
    }

    /// Applies a partial update. `updated_at` is always refreshed, even
    /// when no field changes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] for malformed fields,
    /// [`RegistryError::ConnectionNotFound`] for an unknown id, or
    /// [`RegistryError::NameConflict`] when renaming onto another
    /// connection's name.
    pub async fn update(
        &self,
        id: ConnectionId,
        changes: ConnectionChanges,
    ) -> Result<Connection, RegistryError> {
        let patch = changes.validate()?;
        let connection = self
            .store
            .update_connection(id, &patch, clock::now())
            .await
            .inspect_err(|err| tracing::warn!(%id, error = %err, "connection update rejected"))?;

        tracing::info!(
            %id,
            renamed = patch.name().is_some(),
            touch_only = patch.is_empty(),
            "connection updated"
        );
        Ok(connection)
    }

    /// Soft-deletes a connection. The record stays addressable by id and
    /// remains a valid target for existing backups.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] for an unknown id.
    pub async fn soft_delete(&self, id: ConnectionId) -> Result<(), RegistryError> {
        self.store.deactivate_connection(id, clock::now()).await?;
        tracing::info!(%id, "connection deactivated");
        Ok(())
    }

    /// Lists tables reachable through a connection.
    ///
    /// No live connectivity exists, so a known connection always yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionNotFound`] for an unknown id.
    pub async fn list_tables(&self, id: ConnectionId) -> Result<Vec<String>, RegistryError> {
        self.get(id).await?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;

    fn make_registry() -> ConnectionRegistry {
        ConnectionRegistry::new(Arc::new(InMemoryStore::new()))
    }

    fn new_connection(name: &str) -> NewConnection {
        NewConnection {
            name: Some(name.to_string()),
            connection_string: Some("postgres://x".to_string()),
            schema: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let registry = make_registry();
        let created = tokio_test::assert_ok!(registry.create(new_connection("db1")).await);

        let fetched = tokio_test::assert_ok!(registry.get(created.id).await);
        assert_eq!(fetched.schema, "public");
        assert!(fetched.is_active);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_ids_are_fresh() {
        let registry = make_registry();
        let a = tokio_test::assert_ok!(registry.create(new_connection("a")).await);
        tokio_test::assert_ok!(registry.soft_delete(a.id).await);
        let b = tokio_test::assert_ok!(registry.create(new_connection("b")).await);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn create_without_fields_reports_both() {
        let registry = make_registry();
        let result = registry.create(NewConnection::default()).await;
        let Err(RegistryError::Validation(issues)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(issues.len(), 2);
    }

    #[tokio::test]
    async fn deleted_name_stays_reserved() {
        let registry = make_registry();
        let conn = tokio_test::assert_ok!(registry.create(new_connection("db1")).await);
        tokio_test::assert_ok!(registry.soft_delete(conn.id).await);

        let result = registry.create(new_connection("db1")).await;
        assert!(matches!(result, Err(RegistryError::NameConflict(_))));
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list_but_not_get() {
        let registry = make_registry();
        let conn = tokio_test::assert_ok!(registry.create(new_connection("db1")).await);
        tokio_test::assert_ok!(registry.soft_delete(conn.id).await);

        let active = tokio_test::assert_ok!(registry.list_active().await);
        assert!(active.is_empty());

        let fetched = tokio_test::assert_ok!(registry.get(conn.id).await);
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn empty_update_only_moves_updated_at() {
        let registry = make_registry();
        let before = tokio_test::assert_ok!(registry.create(new_connection("db1")).await);

        let after = tokio_test::assert_ok!(
            registry
                .update(before.id, ConnectionChanges::default())
                .await
        );
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.name, before.name);
        assert_eq!(after.connection_string, before.connection_string);
        assert_eq!(after.schema, before.schema);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.is_active, before.is_active);
    }

    #[tokio::test]
    async fn update_rejects_taken_name() {
        let registry = make_registry();
        tokio_test::assert_ok!(registry.create(new_connection("a")).await);
        let b = tokio_test::assert_ok!(registry.create(new_connection("b")).await);

        let changes = ConnectionChanges {
            name: Some("a".to_string()),
            ..ConnectionChanges::default()
        };
        let result = registry.update(b.id, changes).await;
        assert!(matches!(result, Err(RegistryError::NameConflict(_))));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let registry = make_registry();
        let id = ConnectionId::new();
        assert!(matches!(
            registry.get(id).await,
            Err(RegistryError::ConnectionNotFound(_))
        ));
        assert!(matches!(
            registry.soft_delete(id).await,
            Err(RegistryError::ConnectionNotFound(_))
        ));
        assert!(matches!(
            registry.update(id, ConnectionChanges::default()).await,
            Err(RegistryError::ConnectionNotFound(_))
        ));
        assert!(matches!(
            registry.list_tables(id).await,
            Err(RegistryError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_admit_one_name() {
        let registry = make_registry();
        let handles: Vec<_> = (0..64)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.create(new_connection("dup")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match tokio_test::assert_ok!(handle.await) {
                Ok(_) => created += 1,
                Err(RegistryError::NameConflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);

        let active = tokio_test::assert_ok!(registry.list_active().await);
        assert_eq!(active.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_renames_admit_one_winner() {
        let registry = make_registry();
        let mut ids = Vec::new();
        for i in 0..32 {
            let conn =
                tokio_test::assert_ok!(registry.create(new_connection(&format!("c{i}"))).await);
            ids.push(conn.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    let changes = ConnectionChanges {
                        name: Some("target".to_string()),
                        ..ConnectionChanges::default()
                    };
                    registry.update(id, changes).await
                })
            })
            .collect();

        let mut renamed = 0;
        for handle in handles {
            match tokio_test::assert_ok!(handle.await) {
                Ok(_) => renamed += 1,
                Err(RegistryError::NameConflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(renamed, 1);

        let active = tokio_test::assert_ok!(registry.list_active().await);
        let targets = active.iter().filter(|c| c.name == "target").count();
        assert_eq!(targets, 1);
        assert_eq!(active.len(), 32);
    }

    #[tokio::test]
    async fn list_tables_is_empty_for_known_connection() {
        let registry = make_registry();
        let conn = tokio_test::assert_ok!(registry.create(new_connection("db1")).await);
        let tables = tokio_test::assert_ok!(registry.list_tables(conn.id).await);
        assert!(tables.is_empty());
    }
}
