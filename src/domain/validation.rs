//! Field-level validation results.

use serde::Serialize;
use utoipa::ToSchema;

/// A single problem with one input field.
///
/// Validation collects every issue before failing, so a client sees all
/// missing or malformed fields in one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    /// Name of the offending field as it appears in the request body.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldIssue {
    /// Creates an issue for `field` with a free-form message.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field was required but absent.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::new(field, format!("{field} is required"))
    }

    /// The field length falls outside `1..=max` characters.
    #[must_use]
    pub fn length(field: &str, max: usize) -> Self {
        Self::new(field, format!("{field} must be between 1 and {max} characters"))
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Checks that `value` holds between 1 and `max` characters.
pub(crate) fn check_length(
    field: &str,
    value: &str,
    max: usize,
    issues: &mut Vec<FieldIssue>,
) {
    let len = value.chars().count();
    if len == 0 || len > max {
        issues.push(FieldIssue::length(field, max));
    }
}

/// Requires `value` to be present, recording an issue otherwise.
pub(crate) fn require<T>(field: &str, value: Option<T>, issues: &mut Vec<FieldIssue>) -> Option<T> {
    if value.is_none() {
        issues.push(FieldIssue::missing(field));
    }
    value
}
