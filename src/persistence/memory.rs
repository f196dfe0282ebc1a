//! In-memory store used when no database is configured, and in tests.
//!
//! All state sits behind a single [`tokio::sync::RwLock`], so each write
//! runs its uniqueness check and its mutation under the same guard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::RegistryStore;
use crate::domain::{Backup, BackupEntry, Connection, ConnectionId, ConnectionPatch};
use crate::error::RegistryError;

/// Insertion-ordered, process-local registry storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    connections: Vec<Connection>,
    positions: HashMap<ConnectionId, usize>,
    names: HashMap<String, ConnectionId>,
    backups: Vec<Backup>,
}

impl StoreState {
    fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.positions
            .get(&id)
            .and_then(|&pos| self.connections.get(pos))
    }

    fn connection_mut(&mut self, id: ConnectionId) -> Result<&mut Connection, RegistryError> {
        self.positions
            .get(&id)
            .and_then(|&pos| self.connections.get_mut(pos))
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.to_string()))
    }

    fn entry(&self, backup: &Backup) -> BackupEntry {
        BackupEntry {
            backup: backup.clone(),
            connection_name: self.connection(backup.connection_id).map(|c| c.name.clone()),
        }
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_active_connections(&self) -> Result<Vec<Connection>, RegistryError> {
        let state = self.state.read().await;
        Ok(state
            .connections
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn find_connection(
        &self,
        id: ConnectionId,
    ) -> Result<Option<Connection>, RegistryError> {
        let state = self.state.read().await;
        Ok(state.connection(id).cloned())
    }

    async fn insert_connection(&self, connection: &Connection) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        if state.names.contains_key(&connection.name) {
            return Err(RegistryError::NameConflict(connection.name.clone()));
        }
        if state.positions.contains_key(&connection.id) {
            return Err(RegistryError::Internal(format!(
                "connection {} already exists",
                connection.id
            )));
        }

        let pos = state.connections.len();
        state.positions.insert(connection.id, pos);
        state.names.insert(connection.name.clone(), connection.id);
        state.connections.push(connection.clone());
        Ok(())
    }

    async fn update_connection(
        &self,
        id: ConnectionId,
        patch: &ConnectionPatch,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError> {
        let mut state = self.state.write().await;
        let old_name = state.connection_mut(id)?.name.clone();

        if let Some(new_name) = patch.name()
            && new_name != old_name
        {
            if state.names.contains_key(new_name) {
                return Err(RegistryError::NameConflict(new_name.to_string()));
            }
            state.names.remove(&old_name);
            state.names.insert(new_name.to_string(), id);
        }

        let connection = state.connection_mut(id)?;
        connection.apply(patch, now);
        Ok(connection.clone())
    }

    async fn deactivate_connection(
        &self,
        id: ConnectionId,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError> {
        let mut state = self.state.write().await;
        let connection = state.connection_mut(id)?;
        connection.deactivate(now);
        Ok(connection.clone())
    }

    async fn insert_backup(&self, backup: &Backup) -> Result<BackupEntry, RegistryError> {
        let mut state = self.state.write().await;
        if state.connection(backup.connection_id).is_none() {
            return Err(RegistryError::ConnectionNotFound(
                backup.connection_id.to_string(),
            ));
        }
        state.backups.push(backup.clone());
        Ok(state.entry(backup))
    }

    async fn list_backups(&self) -> Result<Vec<BackupEntry>, RegistryError> {
        let state = self.state.read().await;
        Ok(state.backups.iter().map(|b| state.entry(b)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::backup::DEFAULT_BACKUP_DIR;
    use crate::domain::{ConnectionChanges, NewConnection, clock};

    fn connection(name: &str) -> Connection {
        let input = NewConnection {
            name: Some(name.to_string()),
            connection_string: Some(format!("postgres://{name}")),
            schema: None,
        };
        let Ok(draft) = input.validate() else {
            panic!("valid draft");
        };
        Connection::create(draft, clock::now())
    }

    fn rename(name: &str) -> ConnectionPatch {
        let changes = ConnectionChanges {
            name: Some(name.to_string()),
            ..ConnectionChanges::default()
        };
        let Ok(patch) = changes.validate() else {
            panic!("valid patch");
        };
        patch
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = InMemoryStore::new();
        let conn = connection("db1");
        assert!(store.insert_connection(&conn).await.is_ok());

        let found = store.find_connection(conn.id).await.ok().flatten();
        assert_eq!(found, Some(conn));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_even_when_inactive() {
        let store = InMemoryStore::new();
        let conn = connection("db1");
        let _ = store.insert_connection(&conn).await;
        let _ = store.deactivate_connection(conn.id, clock::now()).await;

        let result = store.insert_connection(&connection("db1")).await;
        assert!(matches!(result, Err(RegistryError::NameConflict(_))));
    }

    #[tokio::test]
    async fn list_active_preserves_insertion_order() {
        let store = InMemoryStore::new();
        let a = connection("a");
        let b = connection("b");
        let c = connection("c");
        for conn in [&a, &b, &c] {
            let _ = store.insert_connection(conn).await;
        }
        let _ = store.deactivate_connection(b.id, clock::now()).await;

        let Ok(active) = store.list_active_connections().await else {
            panic!("list failed");
        };
        let names: Vec<&str> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn rename_releases_old_name() {
        let store = InMemoryStore::new();
        let conn = connection("old");
        let _ = store.insert_connection(&conn).await;

        let renamed = store
            .update_connection(conn.id, &rename("new"), clock::now())
            .await;
        assert!(renamed.is_ok());
        assert!(store.insert_connection(&connection("old")).await.is_ok());
        assert!(matches!(
            store.insert_connection(&connection("new")).await,
            Err(RegistryError::NameConflict(_))
        ));
    }

    #[tokio::test]
    async fn rename_onto_other_name_conflicts() {
        let store = InMemoryStore::new();
        let a = connection("a");
        let b = connection("b");
        let _ = store.insert_connection(&a).await;
        let _ = store.insert_connection(&b).await;

        let result = store.update_connection(b.id, &rename("a"), clock::now()).await;
        assert!(matches!(result, Err(RegistryError::NameConflict(_))));

        let unchanged = store.find_connection(b.id).await.ok().flatten();
        assert_eq!(unchanged.map(|c| c.name), Some("b".to_string()));
    }

    #[tokio::test]
    async fn rename_to_own_name_is_allowed() {
        let store = InMemoryStore::new();
        let conn = connection("same");
        let _ = store.insert_connection(&conn).await;

        let result = store
            .update_connection(conn.id, &rename("same"), clock::now())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let result = store
            .update_connection(ConnectionId::new(), &rename("x"), clock::now())
            .await;
        assert!(matches!(result, Err(RegistryError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn backup_requires_existing_connection() {
        let store = InMemoryStore::new();
        let backup = Backup::record(ConnectionId::new(), DEFAULT_BACKUP_DIR, clock::now());
        let result = store.insert_backup(&backup).await;
        assert!(matches!(result, Err(RegistryError::ConnectionNotFound(_))));

        let Ok(backups) = store.list_backups().await else {
            panic!("list failed");
        };
        assert!(backups.is_empty());
    }

    #[tokio::test]
    async fn backup_name_resolves_at_read_time() {
        let store = InMemoryStore::new();
        let conn = connection("before");
        let _ = store.insert_connection(&conn).await;
        let backup = Backup::record(conn.id, DEFAULT_BACKUP_DIR, clock::now());

        let Ok(entry) = store.insert_backup(&backup).await else {
            panic!("insert failed");
        };
        assert_eq!(entry.connection_name.as_deref(), Some("before"));

        let _ = store
            .update_connection(conn.id, &rename("after"), clock::now())
            .await;
        let Ok(backups) = store.list_backups().await else {
            panic!("list failed");
        };
        let names: Vec<Option<&str>> = backups
            .iter()
            .map(|e| e.connection_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("after")]);
    }
}
