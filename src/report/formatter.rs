//! Error body formatting
//!
//! Rejections carry their violations verbatim under a fixed generic
//! message; any other failure formats as message-only. Field order is the
//! order the engine reported.

use serde::Serialize;

use crate::validator::{ValidationError, Violation};

/// Stable error body for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Violation>>,
}

impl ErrorBody {
    /// Message-only body for failures without structured violations
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ErrorBody serialization cannot fail")
    }
}

/// Formats a validation failure.
///
/// A `Rejected` failure yields the fixed message `"Validation failed"` with
/// its violations attached; anything else yields the failure's own message
/// and no violations list.
pub fn format_error(failure: &ValidationError) -> ErrorBody {
    match failure.violations() {
        Some(violations) => ErrorBody {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(violations.to_vec()),
        },
        None => ErrorBody::from_message(failure.to_string()),
    }
}

/// Formats any other failure (a programming error, an I/O problem) as a
/// message-only body.
pub fn format_failure(failure: &dyn std::error::Error) -> ErrorBody {
    ErrorBody::from_message(failure.to_string())
}
