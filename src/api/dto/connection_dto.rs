//! Connection DTOs for create, update, and read operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Connection, ConnectionChanges, ConnectionId, NewConnection};

/// Request body for `POST /connections`.
///
/// Every field is optional at the wire level so that missing fields are
/// reported together as one validation error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateConnectionRequest {
    /// Unique display name (1–100 characters). Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque connection string (1–500 characters). Required.
    #[serde(default)]
    pub connection_string: Option<String>,
    /// Schema name (1–100 characters). Defaults to `"public"`.
    #[serde(default)]
    pub schema: Option<String>,
}

impl From<CreateConnectionRequest> for NewConnection {
    fn from(req: CreateConnectionRequest) -> Self {
        Self {
            name: req.name,
            connection_string: req.connection_string,
            schema: req.schema,
        }
    }
}

/// Request body for `PUT /connections/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateConnectionRequest {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement connection string.
    #[serde(default)]
    pub connection_string: Option<String>,
    /// Replacement schema.
    #[serde(default)]
    pub schema: Option<String>,
}

impl From<UpdateConnectionRequest> for ConnectionChanges {
    fn from(req: UpdateConnectionRequest) -> Self {
        Self {
            name: req.name,
            connection_string: req.connection_string,
            schema: req.schema,
        }
    }
}

/// Connection representation returned by every connection endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionDto {
    /// Connection identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: ConnectionId,
    /// Unique display name.
    pub name: String,
    /// Opaque connection string.
    pub connection_string: String,
    /// Schema name.
    pub schema: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp (ISO-8601).
    pub updated_at: DateTime<Utc>,
    /// `false` once soft-deleted.
    pub is_active: bool,
}

impl From<Connection> for ConnectionDto {
    fn from(c: Connection) -> Self {
        Self {
            id: c.id,
            name: c.name,
            connection_string: c.connection_string,
            schema: c.schema,
            created_at: c.created_at,
            updated_at: c.updated_at,
            is_active: c.is_active,
        }
    }
}
