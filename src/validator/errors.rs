//! Validation error types
//!
//! Two failure kinds propagate to callers:
//! - `Rejected` (DESK_VALIDATION_REJECTED): user-input problem, carries the
//!   full ordered violations list
//! - `SchemaNotFound` (DESK_UNKNOWN_SCHEMA): caller asked for an
//!   unregistered schema; a programming error, fatal to the request path

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// One broken rule: the dot-notation path of the field and a user-facing
/// message. A single field may contribute several violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dot-notation field path, e.g. `address.city` or `items[1].sku`
    pub field: String,
    /// Stable user-facing message
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// Validation failures
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// One or more field rules violated. Violations keep schema declaration
    /// order so the report is reproducible.
    #[error("Validation failed")]
    Rejected { violations: Vec<Violation> },

    /// Requested schema name is not registered
    #[error("Schema '{0}' is not registered")]
    SchemaNotFound(String),
}

impl ValidationError {
    /// Create a rejection carrying the given violations
    pub fn rejected(violations: Vec<Violation>) -> Self {
        ValidationError::Rejected { violations }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Rejected { .. } => "DESK_VALIDATION_REJECTED",
            ValidationError::SchemaNotFound(_) => "DESK_UNKNOWN_SCHEMA",
        }
    }

    /// Returns the structured violations list, if this failure carries one
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ValidationError::Rejected { violations } => Some(violations),
            ValidationError::SchemaNotFound(_) => None,
        }
    }

    /// Whether the failure is safe to surface to the end user as-is.
    ///
    /// `SchemaNotFound` is an internal error and must be logged rather than
    /// echoed to clients.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ValidationError::Rejected { .. })
    }
}
