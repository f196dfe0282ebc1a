//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgment body, e.g. for `DELETE /connections/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `GET /connections/{id}/tables`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TablesResponse {
    /// Table names visible through the connection.
    pub tables: Vec<String>,
}
