//! Payload validation engine
//!
//! Validation semantics:
//! - Every rule is evaluated; the engine never stops at the first violation
//! - Violations keep schema declaration order (depth-first through nested
//!   objects and arrays)
//! - Unknown fields are stripped from the normalized output, silently
//! - Values are coerced to their declared types; coercion is idempotent
//! - Time-relative bounds are resolved when validation runs
//! - With the engine absent, or no schema given, validation is a pass-through

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Utc};
use serde_json::{Map, Value};

use crate::observability::Logger;
use crate::sanitize::checks;

use super::errors::Violation;
use super::types::{DateBound, Field, FieldType, IntBound, Schema, StringFormat};

/// Whether the rule-evaluation engine is present in this process.
///
/// Fixed once at startup. When absent, schema-bound validation degrades to
/// pass-through while sanitizers keep working; availability is traded for
/// strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineAvailability {
    Present,
    Absent,
}

static AVAILABILITY: OnceLock<EngineAvailability> = OnceLock::new();

/// Fixes the process-wide availability flag. The first call wins; later
/// calls are ignored.
pub fn set_engine_availability(availability: EngineAvailability) {
    let stored = *AVAILABILITY.get_or_init(|| availability);
    if stored == EngineAvailability::Absent {
        Logger::warn("VALIDATION_ENGINE_ABSENT", &[("mode", "pass-through")]);
    }
}

/// Returns the process-wide availability flag, `Present` when never set.
pub fn engine_availability() -> EngineAvailability {
    AVAILABILITY
        .get()
        .copied()
        .unwrap_or(EngineAvailability::Present)
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Payload passed: only declared fields, coerced to declared types
    Accepted(Value),
    /// Payload failed: every broken rule, in schema declaration order
    Rejected(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }
}

/// Evaluates payloads against schemas. Stateless per call; any number of
/// engines may validate concurrently.
pub struct ValidationEngine {
    availability: EngineAvailability,
}

impl ValidationEngine {
    /// Engine bound to the process-wide availability flag
    pub fn new() -> Self {
        Self {
            availability: engine_availability(),
        }
    }

    /// Engine with an explicit availability, independent of the process flag
    pub fn with_availability(availability: EngineAvailability) -> Self {
        Self { availability }
    }

    /// Validates a payload against a schema.
    ///
    /// With the engine absent or no schema given, the payload is returned
    /// unchanged. Otherwise every field rule is evaluated and the outcome is
    /// either the normalized payload or the complete violations list.
    pub fn validate(&self, schema: Option<&Schema>, payload: &Value) -> ValidationOutcome {
        let schema = match (self.availability, schema) {
            (EngineAvailability::Absent, _) | (_, None) => {
                return ValidationOutcome::Accepted(payload.clone());
            }
            (EngineAvailability::Present, Some(schema)) => schema,
        };

        let obj = match payload.as_object() {
            Some(obj) => obj,
            None => {
                return ValidationOutcome::Rejected(vec![Violation::new(
                    "$root",
                    "must be an object",
                )]);
            }
        };

        let mut violations = Vec::new();
        let normalized = validate_fields(schema.fields(), obj, "", &mut violations);

        if violations.is_empty() {
            ValidationOutcome::Accepted(Value::Object(normalized))
        } else {
            ValidationOutcome::Rejected(violations)
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a field list in declaration order, collecting violations and
/// building the normalized object. Unknown keys in `obj` are dropped.
fn validate_fields(
    fields: &[Field],
    obj: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Map<String, Value> {
    let mut out = Map::new();

    for field in fields {
        let rule = &field.rule;
        let path = join_path(prefix, &field.name);

        // Null counts as absent; so does a whitespace-only string when the
        // rule says empty-as-absent.
        let value = obj.get(&field.name).filter(|v| !v.is_null());
        let value = match value {
            Some(Value::String(s)) if rule.empty_is_absent && s.trim().is_empty() => None,
            other => other,
        };

        match value {
            None => {
                if rule.required {
                    violations.push(Violation::new(&path, "is required"));
                } else if let Some(default) = &rule.default {
                    out.insert(field.name.clone(), default.clone());
                }
                // Absent optional field without a default: dropped.
            }
            Some(value) => {
                let before = violations.len();
                let normalized = check_value(&rule.field_type, value, &path, violations);
                if violations.len() == before {
                    if let Some(normalized) = normalized {
                        out.insert(field.name.clone(), normalized);
                    }
                }
            }
        }
    }

    out
}

/// Checks one value against a field type, appending any violations, and
/// returns the coerced value. Bounds and formats are only checked once the
/// base type matches.
fn check_value(
    field_type: &FieldType,
    value: &Value,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    match field_type {
        FieldType::String {
            min_len,
            max_len,
            format,
        } => {
            let s = match value.as_str() {
                Some(s) => s,
                None => {
                    violations.push(Violation::new(path, "must be a string"));
                    return None;
                }
            };
            let len = s.chars().count();
            if let Some(min) = min_len {
                if len < *min {
                    violations.push(Violation::new(
                        path,
                        format!("must be at least {} characters", min),
                    ));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    violations.push(Violation::new(
                        path,
                        format!("must be at most {} characters", max),
                    ));
                }
            }
            if let Some(format) = format {
                if !format_matches(*format, s) {
                    violations.push(Violation::new(path, format_message(*format)));
                }
            }
            Some(Value::String(s.to_string()))
        }

        FieldType::Number { min, max } => {
            let n = match coerce_number(value) {
                Some(n) => n,
                None => {
                    violations.push(Violation::new(path, "must be a number"));
                    return None;
                }
            };
            if let Some(min) = min {
                if n < *min {
                    violations.push(Violation::new(path, format!("must be at least {}", min)));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    violations.push(Violation::new(path, format!("must be at most {}", max)));
                }
            }
            // Keep the original JSON number representation when there was
            // one, so normalization does not turn 5 into 5.0.
            if value.is_number() {
                Some(value.clone())
            } else {
                serde_json::Number::from_f64(n).map(Value::Number)
            }
        }

        FieldType::Integer { min, max } => {
            let n = match coerce_integer(value) {
                Some(n) => n,
                None => {
                    violations.push(Violation::new(path, "must be an integer"));
                    return None;
                }
            };
            if let Some(bound) = min {
                let lo = resolve_int_bound(*bound);
                if n < lo {
                    violations.push(Violation::new(path, format!("must be at least {}", lo)));
                }
            }
            if let Some(bound) = max {
                let hi = resolve_int_bound(*bound);
                if n > hi {
                    violations.push(Violation::new(path, format!("must be at most {}", hi)));
                }
            }
            Some(Value::from(n))
        }

        FieldType::Bool => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if s == "true" => Some(Value::Bool(true)),
            Value::String(s) if s == "false" => Some(Value::Bool(false)),
            _ => {
                violations.push(Violation::new(path, "must be a boolean"));
                None
            }
        },

        FieldType::Date {
            not_before,
            not_after,
        } => {
            let parsed = value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
                .map(|d| d.with_timezone(&Utc));
            let parsed = match parsed {
                Some(parsed) => parsed,
                None => {
                    violations.push(Violation::new(path, "must be an RFC 3339 date-time"));
                    return None;
                }
            };
            if let Some(bound) = not_before {
                if parsed < resolve_date_bound(*bound) {
                    violations.push(Violation::new(path, date_floor_message(*bound)));
                }
            }
            if let Some(bound) = not_after {
                if parsed > resolve_date_bound(*bound) {
                    violations.push(Violation::new(path, date_ceiling_message(*bound)));
                }
            }
            Some(Value::String(parsed.to_rfc3339()))
        }

        FieldType::OneOf { values } => {
            let matched = value.as_str().filter(|s| values.iter().any(|v| v == s));
            match matched {
                Some(s) => Some(Value::String(s.to_string())),
                None => {
                    violations.push(Violation::new(
                        path,
                        format!("must be one of: {}", values.join(", ")),
                    ));
                    None
                }
            }
        }

        FieldType::Object { fields } => {
            let obj = match value.as_object() {
                Some(obj) => obj,
                None => {
                    violations.push(Violation::new(path, "must be an object"));
                    return None;
                }
            };
            let normalized = validate_fields(fields, obj, path, violations);
            Some(Value::Object(normalized))
        }

        FieldType::Array {
            element,
            min_items,
            max_items,
        } => {
            let arr = match value.as_array() {
                Some(arr) => arr,
                None => {
                    violations.push(Violation::new(path, "must be an array"));
                    return None;
                }
            };
            if let Some(min) = min_items {
                if arr.len() < *min {
                    violations.push(Violation::new(
                        path,
                        format!("must contain at least {} item(s)", min),
                    ));
                }
            }
            if let Some(max) = max_items {
                if arr.len() > *max {
                    violations.push(Violation::new(
                        path,
                        format!("must contain at most {} item(s)", max),
                    ));
                }
            }
            let mut out = Vec::with_capacity(arr.len());
            for (i, elem) in arr.iter().enumerate() {
                let elem_path = format!("{}[{}]", path, i);
                if elem.is_null() {
                    violations.push(Violation::new(elem_path, "must not be null"));
                    continue;
                }
                if let Some(normalized) = check_value(element, elem, &elem_path, violations) {
                    out.push(normalized);
                }
            }
            Some(Value::Array(out))
        }
    }
}

/// Numbers pass through; numeric strings are parsed.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Integers pass through; whole floats and integral strings are coerced.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn resolve_int_bound(bound: IntBound) -> i64 {
    match bound {
        IntBound::Fixed(v) => v,
        IntBound::CurrentYearPlus(offset) => i64::from(Utc::now().year()) + offset,
    }
}

fn resolve_date_bound(bound: DateBound) -> DateTime<Utc> {
    match bound {
        DateBound::Fixed(t) => t,
        DateBound::Now => Utc::now(),
    }
}

fn date_floor_message(bound: DateBound) -> String {
    match bound {
        DateBound::Now => "must not be in the past".to_string(),
        DateBound::Fixed(t) => format!("must not be earlier than {}", t.to_rfc3339()),
    }
}

fn date_ceiling_message(bound: DateBound) -> String {
    match bound {
        DateBound::Now => "must not be in the future".to_string(),
        DateBound::Fixed(t) => format!("must not be later than {}", t.to_rfc3339()),
    }
}

fn format_matches(format: StringFormat, s: &str) -> bool {
    match format {
        StringFormat::Email => checks::is_email(s),
        StringFormat::Phone => checks::is_phone(s),
        StringFormat::Uri => checks::is_uri(s),
        StringFormat::ObjectId => checks::is_object_id(s),
    }
}

fn format_message(format: StringFormat) -> &'static str {
    match format {
        StringFormat::Email => "must be a valid email address",
        StringFormat::Phone => "must be a valid phone number",
        StringFormat::Uri => "must be a valid http(s) URL",
        StringFormat::ObjectId => "must be a 24-character hexadecimal identifier",
    }
}

/// Creates a dot-notation field path from prefix and field name.
fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
