//! PostgreSQL implementation of the registry store.
//!
//! Each write runs inside one `sqlx` transaction. Dropping the
//! transaction on an early return rolls it back, so a failed write is
//! never visible to later reads. The `UNIQUE (name)` and foreign-key
//! constraints back up the explicit checks when two writers race.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::RegistryStore;
use super::models::{BackupRow, ConnectionRow};
use crate::domain::{Backup, BackupEntry, Connection, ConnectionId, ConnectionPatch};
use crate::error::RegistryError;

const CONNECTION_COLUMNS: &str =
    "id, name, connection_string, schema, created_at, updated_at, is_active";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), RegistryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(RegistryError::persistence)
    }

    async fn name_taken(
        conn: &mut sqlx::PgConnection,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, RegistryError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM connection WHERE name = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(name)
        .bind(except)
        .fetch_one(conn)
        .await
        .map_err(RegistryError::persistence)
    }

    async fn lock_connection(
        conn: &mut sqlx::PgConnection,
        id: ConnectionId,
    ) -> Result<Connection, RegistryError> {
        let sql = format!("SELECT {CONNECTION_COLUMNS} FROM connection WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ConnectionRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(conn)
            .await
            .map_err(RegistryError::persistence)?
            .map(Connection::from)
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.to_string()))
    }

    async fn write_connection(
        conn: &mut sqlx::PgConnection,
        connection: &Connection,
    ) -> Result<(), RegistryError> {
        sqlx::query(
            "UPDATE connection SET name = $2, connection_string = $3, schema = $4, \
             updated_at = $5, is_active = $6 WHERE id = $1",
        )
        .bind(connection.id.as_uuid())
        .bind(&connection.name)
        .bind(&connection.connection_string)
        .bind(&connection.schema)
        .bind(connection.updated_at)
        .bind(connection.is_active)
        .execute(conn)
        .await
        .map_err(|e| classify_name_error(e, &connection.name))?;
        Ok(())
    }
}

#[async_trait]
impl RegistryStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_active_connections(&self) -> Result<Vec<Connection>, RegistryError> {
        let sql =
            format!("SELECT {CONNECTION_COLUMNS} FROM connection WHERE is_active ORDER BY seq");
        let rows = sqlx::query_as::<_, ConnectionRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(RegistryError::persistence)?;
        Ok(rows.into_iter().map(Connection::from).collect())
    }

    async fn find_connection(
        &self,
        id: ConnectionId,
    ) -> Result<Option<Connection>, RegistryError> {
        let sql = format!("SELECT {CONNECTION_COLUMNS} FROM connection WHERE id = $1");
        let row = sqlx::query_as::<_, ConnectionRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::persistence)?;
        Ok(row.map(Connection::from))
    }

    async fn insert_connection(&self, connection: &Connection) -> Result<(), RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::persistence)?;

        if Self::name_taken(&mut *tx, &connection.name, None).await? {
            return Err(RegistryError::NameConflict(connection.name.clone()));
        }

        sqlx::query(
            "INSERT INTO connection \
             (id, name, connection_string, schema, created_at, updated_at, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(connection.id.as_uuid())
        .bind(&connection.name)
        .bind(&connection.connection_string)
        .bind(&connection.schema)
        .bind(connection.created_at)
        .bind(connection.updated_at)
        .bind(connection.is_active)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify_name_error(e, &connection.name))?;

        tx.commit().await.map_err(RegistryError::persistence)
    }

    async fn update_connection(
        &self,
        id: ConnectionId,
        patch: &ConnectionPatch,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::persistence)?;
        let mut connection = Self::lock_connection(&mut *tx, id).await?;

        if let Some(new_name) = patch.name()
            && new_name != connection.name
            && Self::name_taken(&mut *tx, new_name, Some(*id.as_uuid())).await?
        {
            return Err(RegistryError::NameConflict(new_name.to_string()));
        }

        connection.apply(patch, now);
        Self::write_connection(&mut *tx, &connection).await?;
        tx.commit().await.map_err(RegistryError::persistence)?;
        Ok(connection)
    }

    async fn deactivate_connection(
        &self,
        id: ConnectionId,
        now: DateTime<Utc>,
    ) -> Result<Connection, RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::persistence)?;
        let mut connection = Self::lock_connection(&mut *tx, id).await?;
        connection.deactivate(now);
        Self::write_connection(&mut *tx, &connection).await?;
        tx.commit().await.map_err(RegistryError::persistence)?;
        Ok(connection)
    }

    async fn insert_backup(&self, backup: &Backup) -> Result<BackupEntry, RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::persistence)?;

        let connection_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM connection WHERE id = $1 FOR SHARE",
        )
        .bind(backup.connection_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(RegistryError::persistence)?
        .ok_or_else(|| RegistryError::ConnectionNotFound(backup.connection_id.to_string()))?;

        sqlx::query(
            "INSERT INTO backup (id, connection_id, filename, filepath, size_mb, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(backup.id.as_uuid())
        .bind(backup.connection_id.as_uuid())
        .bind(&backup.filename)
        .bind(&backup.filepath)
        .bind(backup.size_mb)
        .bind(backup.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify_reference_error(e, backup.connection_id))?;

        tx.commit().await.map_err(RegistryError::persistence)?;

        Ok(BackupEntry {
            backup: backup.clone(),
            connection_name: Some(connection_name),
        })
    }

    async fn list_backups(&self) -> Result<Vec<BackupEntry>, RegistryError> {
        let rows = sqlx::query_as::<_, BackupRow>(
            "SELECT b.id, b.connection_id, b.filename, b.filepath, b.size_mb, b.created_at, \
             c.name AS connection_name \
             FROM backup b LEFT JOIN connection c ON c.id = b.connection_id \
             ORDER BY b.seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RegistryError::persistence)?;
        Ok(rows.into_iter().map(BackupEntry::from).collect())
    }
}

/// Maps a unique violation on `connection.name` to a conflict.
fn classify_name_error(err: sqlx::Error, name: &str) -> RegistryError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return RegistryError::NameConflict(name.to_string());
    }
    RegistryError::persistence(err)
}

/// Maps a foreign-key violation on `backup.connection_id` to not-found.
fn classify_reference_error(err: sqlx::Error, connection_id: ConnectionId) -> RegistryError {
    if let sqlx::Error::Database(db) = &err
        && db.is_foreign_key_violation()
    {
        return RegistryError::ConnectionNotFound(connection_id.to_string());
    }
    RegistryError::persistence(err)
}
