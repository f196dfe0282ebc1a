//! Registry error types with HTTP status code mapping.
//!
//! [`RegistryError`] is the central error type for the service. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::FieldIssue;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: name is required",
///     "details": [{ "field": "name", "message": "name is required" }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Per-field problems for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status               |
/// |-----------|-----------------------|---------------------------|
/// | 1000–1999 | Validation / Conflict | 400 Bad Request           |
/// | 2000–2999 | Not Found             | 404 Not Found             |
/// | 3000–3999 | Server                | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// One or more request fields are missing or malformed.
    #[error("invalid request: {}", summarize(.0))]
    Validation(Vec<FieldIssue>),

    /// Another connection already uses this name.
    #[error("connection with name {0:?} already exists")]
    NameConflict(String),

    /// No connection resolves from the given identifier.
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    /// Storage layer failure. Any write in progress was rolled back.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::NameConflict(_) => 1002,
            Self::ConnectionNotFound(_) => 2001,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NameConflict(_) => StatusCode::BAD_REQUEST,
            Self::ConnectionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wraps a storage failure, logging it at error level.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        Self::Persistence(err.to_string())
    }
}

impl From<Vec<FieldIssue>> for RegistryError {
    fn from(issues: Vec<FieldIssue>) -> Self {
        Self::Validation(issues)
    }
}

impl From<JsonRejection> for RegistryError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldIssue::new("body", rejection.body_text())])
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let code = self.error_code();
        let details = match self {
            Self::Validation(issues) => Some(issues),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };
        (status, axum::Json(body)).into_response()
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
