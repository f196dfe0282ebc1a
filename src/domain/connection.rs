//! Connection profiles: the named handles the registry manages.
//!
//! A [`Connection`] is never physically removed. Soft-deleting flips
//! `is_active` so that existing backups keep a valid reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConnectionId;
use super::clock;
use super::validation::{FieldIssue, check_length, require};

/// Schema assumed when a create request does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Maximum length of [`Connection::name`], in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum length of [`Connection::connection_string`], in characters.
pub const CONNECTION_STRING_MAX_CHARS: usize = 500;

/// Maximum length of [`Connection::schema`], in characters.
pub const SCHEMA_MAX_CHARS: usize = 100;

/// A named, reusable profile describing how to reach a target database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier (immutable after creation).
    pub id: ConnectionId,
    /// Display name, unique across active and inactive connections.
    pub name: String,
    /// Opaque connection string. Never parsed by the registry.
    pub connection_string: String,
    /// Default schema inside the target database.
    pub schema: String,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
    /// `false` once the connection has been soft-deleted.
    pub is_active: bool,
}

impl Connection {
    /// Builds a fresh, active connection from a validated draft.
    #[must_use]
    pub fn create(draft: ConnectionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ConnectionId::new(),
            name: draft.name,
            connection_string: draft.connection_string,
            schema: draft.schema,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Applies the supplied fields of `patch` and refreshes `updated_at`.
    ///
    /// Name uniqueness is not checked here; stores enforce it atomically
    /// with the write.
    pub fn apply(&mut self, patch: &ConnectionPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(connection_string) = &patch.connection_string {
            self.connection_string.clone_from(connection_string);
        }
        if let Some(schema) = &patch.schema {
            self.schema.clone_from(schema);
        }
        self.touch(now);
    }

    /// Marks the connection inactive and refreshes `updated_at`.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = clock::advance(self.updated_at, now);
    }
}

/// Unvalidated fields for a new connection, as received from a client.
#[derive(Debug, Clone, Default)]
pub struct NewConnection {
    /// Requested name.
    pub name: Option<String>,
    /// Requested connection string.
    pub connection_string: Option<String>,
    /// Requested schema. Defaults to [`DEFAULT_SCHEMA`].
    pub schema: Option<String>,
}

impl NewConnection {
    /// Validates every field, reporting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the list of [`FieldIssue`]s when a required field is
    /// missing or any field is empty or too long.
    pub fn validate(self) -> Result<ConnectionDraft, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let name = require("name", self.name, &mut issues);
        let connection_string = require("connection_string", self.connection_string, &mut issues);
        let schema = self.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        if let Some(name) = &name {
            check_length("name", name, NAME_MAX_CHARS, &mut issues);
        }
        if let Some(connection_string) = &connection_string {
            check_length(
                "connection_string",
                connection_string,
                CONNECTION_STRING_MAX_CHARS,
                &mut issues,
            );
        }
        check_length("schema", &schema, SCHEMA_MAX_CHARS, &mut issues);

        match (name, connection_string) {
            (Some(name), Some(connection_string)) if issues.is_empty() => Ok(ConnectionDraft {
                name,
                connection_string,
                schema,
            }),
            _ => Err(issues),
        }
    }
}

/// Validated input for [`Connection::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDraft {
    name: String,
    connection_string: String,
    schema: String,
}

/// Unvalidated partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ConnectionChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement connection string.
    pub connection_string: Option<String>,
    /// Replacement schema.
    pub schema: Option<String>,
}

impl ConnectionChanges {
    /// Validates the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns the list of [`FieldIssue`]s for every supplied field that
    /// is empty or too long.
    pub fn validate(self) -> Result<ConnectionPatch, Vec<FieldIssue>> {
        let mut issues = Vec::new();
        if let Some(name) = &self.name {
            check_length("name", name, NAME_MAX_CHARS, &mut issues);
        }
        if let Some(connection_string) = &self.connection_string {
            check_length(
                "connection_string",
                connection_string,
                CONNECTION_STRING_MAX_CHARS,
                &mut issues,
            );
        }
        if let Some(schema) = &self.schema {
            check_length("schema", schema, SCHEMA_MAX_CHARS, &mut issues);
        }

        if issues.is_empty() {
            Ok(ConnectionPatch {
                name: self.name,
                connection_string: self.connection_string,
                schema: self.schema,
            })
        } else {
            Err(issues)
        }
    }
}

/// Validated partial update for [`Connection::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPatch {
    name: Option<String>,
    connection_string: Option<String>,
    schema: Option<String>,
}

impl ConnectionPatch {
    /// The replacement name, if one was supplied.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.connection_string.is_none() && self.schema.is_none()
    }
}
