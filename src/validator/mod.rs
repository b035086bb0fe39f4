//! Schema-driven payload validation
//!
//! # Design principles
//!
//! - Schemas are fixed at process start and never mutated
//! - Every rule is evaluated; violations are aggregated, never truncated
//! - Violation order follows schema declaration order
//! - Normalized output carries only declared fields, coerced to their
//!   declared types
//! - Validation is a pure function of (schema, payload); calls may run
//!   concurrently without coordination

mod engine;
mod errors;
mod registry;
mod types;

pub use engine::{
    engine_availability, set_engine_availability, EngineAvailability, ValidationEngine,
    ValidationOutcome,
};
pub use errors::{ValidationError, ValidationResult, Violation};
pub use registry::{registry, SchemaRegistry};
pub use types::{DateBound, Field, FieldRule, FieldType, IntBound, Schema, StringFormat};

use serde_json::Value;

use crate::observability::Logger;

/// Validates a payload against a registered schema.
///
/// Returns the normalized payload on success. `Rejected` carries the full
/// ordered violations list; `SchemaNotFound` means the caller asked for a
/// name outside the registered set and is logged as an internal error.
pub fn validate(schema_name: &str, payload: &Value) -> ValidationResult<Value> {
    let schema = match registry().get(schema_name) {
        Some(schema) => schema,
        None => {
            Logger::error("UNKNOWN_SCHEMA", &[("schema", schema_name)]);
            return Err(ValidationError::SchemaNotFound(schema_name.to_string()));
        }
    };

    match ValidationEngine::new().validate(Some(schema), payload) {
        ValidationOutcome::Accepted(value) => Ok(value),
        ValidationOutcome::Rejected(violations) => Err(ValidationError::rejected(violations)),
    }
}
