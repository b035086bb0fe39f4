//! Field rule and schema definitions
//!
//! Supported base types:
//! - string: UTF-8 string, optional length bounds and format constraint
//! - number: 64-bit floating point with optional value bounds
//! - integer: 64-bit signed integer with optional value bounds
//! - bool: Boolean
//! - date: RFC 3339 date-time with optional temporal bounds
//! - one-of: fixed set of legal string values
//! - object: nested object with its own field list
//! - array: homogeneous array with element type and item-count bounds

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::sanitize::checks::{PRICE_CEILING, SUPPORTED_CURRENCIES, YEAR_FLOOR};

/// Format constraint for string fields.
///
/// Formats exist only on the string type, so a format constraint can never
/// be declared against a non-string rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Permissive `local@domain.tld` shape, not full RFC grammar
    Email,
    /// Dialable phone number, optional leading `+`
    Phone,
    /// `http://` or `https://` URL
    Uri,
    /// 24-character hexadecimal document identifier
    ObjectId,
}

/// Integer bound, either fixed or relative to the calendar year at the
/// moment validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntBound {
    Fixed(i64),
    /// Current calendar year plus the given offset
    CurrentYearPlus(i64),
}

/// Date bound, either fixed or the moment validation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateBound {
    Fixed(DateTime<Utc>),
    Now,
}

/// Supported field types.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// UTF-8 string
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        format: Option<StringFormat>,
    },
    /// 64-bit floating point
    Number { min: Option<f64>, max: Option<f64> },
    /// 64-bit signed integer
    Integer { min: Option<IntBound>, max: Option<IntBound> },
    /// Boolean
    Bool,
    /// RFC 3339 date-time, normalized to UTC
    Date {
        not_before: Option<DateBound>,
        not_after: Option<DateBound>,
    },
    /// One of a fixed set of string values
    OneOf { values: Vec<String> },
    /// Nested object with its own field list
    Object { fields: Vec<Field> },
    /// Homogeneous array with single element type
    Array {
        element: Box<FieldType>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
}

impl FieldType {
    /// Returns the type name for violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Number { .. } => "number",
            FieldType::Integer { .. } => "integer",
            FieldType::Bool => "bool",
            FieldType::Date { .. } => "date",
            FieldType::OneOf { .. } => "one-of",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }

    /// Unbounded string
    pub fn string() -> Self {
        FieldType::String {
            min_len: None,
            max_len: None,
            format: None,
        }
    }

    /// String with length bounds (counted in characters)
    pub fn text(min_len: usize, max_len: usize) -> Self {
        FieldType::String {
            min_len: Some(min_len),
            max_len: Some(max_len),
            format: None,
        }
    }

    /// String that must parse as an email address
    pub fn email() -> Self {
        FieldType::String {
            min_len: None,
            max_len: Some(254),
            format: Some(StringFormat::Email),
        }
    }

    /// String that must parse as a phone number
    pub fn phone() -> Self {
        FieldType::String {
            min_len: None,
            max_len: Some(32),
            format: Some(StringFormat::Phone),
        }
    }

    /// String that must parse as an http(s) URL
    pub fn uri() -> Self {
        FieldType::String {
            min_len: None,
            max_len: Some(2048),
            format: Some(StringFormat::Uri),
        }
    }

    /// String that must be a 24-character hexadecimal document identifier
    pub fn object_id() -> Self {
        FieldType::String {
            min_len: None,
            max_len: None,
            format: Some(StringFormat::ObjectId),
        }
    }

    /// Unbounded number
    pub fn number() -> Self {
        FieldType::Number {
            min: None,
            max: None,
        }
    }

    /// Monetary amount: non-negative, capped at the price ceiling
    pub fn price() -> Self {
        FieldType::Number {
            min: Some(0.0),
            max: Some(PRICE_CEILING),
        }
    }

    /// Unbounded integer
    pub fn integer() -> Self {
        FieldType::Integer {
            min: None,
            max: None,
        }
    }

    /// Integer with an inclusive lower bound
    pub fn integer_at_least(min: i64) -> Self {
        FieldType::Integer {
            min: Some(IntBound::Fixed(min)),
            max: None,
        }
    }

    /// Integer with inclusive bounds
    pub fn integer_between(min: i64, max: i64) -> Self {
        FieldType::Integer {
            min: Some(IntBound::Fixed(min)),
            max: Some(IntBound::Fixed(max)),
        }
    }

    /// Calendar year: 1900 up to one year past the current year,
    /// evaluated when validation runs
    pub fn year() -> Self {
        FieldType::Integer {
            min: Some(IntBound::Fixed(YEAR_FLOOR)),
            max: Some(IntBound::CurrentYearPlus(1)),
        }
    }

    /// Boolean
    pub fn boolean() -> Self {
        FieldType::Bool
    }

    /// Unbounded RFC 3339 date-time
    pub fn date() -> Self {
        FieldType::Date {
            not_before: None,
            not_after: None,
        }
    }

    /// Date-time that must not lie in the past at validation time
    pub fn future_date() -> Self {
        FieldType::Date {
            not_before: Some(DateBound::Now),
            not_after: None,
        }
    }

    /// One of a fixed set of string values
    pub fn one_of(values: &[&str]) -> Self {
        FieldType::OneOf {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Supported currency code
    pub fn currency() -> Self {
        Self::one_of(SUPPORTED_CURRENCIES)
    }

    /// Nested object with its own field list
    pub fn object(fields: Vec<Field>) -> Self {
        FieldType::Object { fields }
    }

    /// Array of the given element type, no item-count bounds
    pub fn array(element: FieldType) -> Self {
        FieldType::Array {
            element: Box::new(element),
            min_items: None,
            max_items: None,
        }
    }

    /// Array of the given element type with item-count bounds
    pub fn array_bounded(element: FieldType, min_items: usize, max_items: usize) -> Self {
        FieldType::Array {
            element: Box::new(element),
            min_items: Some(min_items),
            max_items: Some(max_items),
        }
    }

    /// Checks the declaration itself: enum sets non-empty, bounds ordered,
    /// nested declarations sound.
    fn check_declaration(&self) -> Result<(), String> {
        match self {
            FieldType::String {
                min_len, max_len, ..
            } => {
                if let (Some(lo), Some(hi)) = (min_len, max_len) {
                    if lo > hi {
                        return Err(format!("string length bounds out of order ({lo} > {hi})"));
                    }
                }
            }
            FieldType::Number { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(format!("number bounds out of order ({lo} > {hi})"));
                    }
                }
            }
            FieldType::Integer { min, max } => {
                if let (Some(IntBound::Fixed(lo)), Some(IntBound::Fixed(hi))) = (min, max) {
                    if lo > hi {
                        return Err(format!("integer bounds out of order ({lo} > {hi})"));
                    }
                }
            }
            FieldType::OneOf { values } => {
                if values.is_empty() {
                    return Err("one-of constraint has no legal values".to_string());
                }
            }
            FieldType::Object { fields } => {
                check_field_list(fields)?;
            }
            FieldType::Array {
                element,
                min_items,
                max_items,
            } => {
                if let (Some(lo), Some(hi)) = (min_items, max_items) {
                    if lo > hi {
                        return Err(format!("item count bounds out of order ({lo} > {hi})"));
                    }
                }
                element.check_declaration()?;
            }
            FieldType::Bool | FieldType::Date { .. } => {}
        }
        Ok(())
    }
}

/// Presence, default, and type constraints for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Field data type and its bounds
    pub field_type: FieldType,
    /// Whether the field must be present
    pub required: bool,
    /// Treat a whitespace-only string as if the field were absent
    pub empty_is_absent: bool,
    /// Injected when an optional field is absent; absent optional fields
    /// without a default are dropped
    pub default: Option<Value>,
}

impl FieldRule {
    /// Create a required field rule
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            empty_is_absent: false,
            default: None,
        }
    }

    /// Create an optional field rule
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            empty_is_absent: false,
            default: None,
        }
    }

    /// Treat a whitespace-only string as absent for presence checking
    pub fn empty_as_absent(mut self) -> Self {
        self.empty_is_absent = true;
        self
    }

    /// Attach a default injected when the field is absent
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A named field and its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub rule: FieldRule,
}

impl Field {
    pub fn new(name: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// Named, immutable payload specification.
///
/// Field order is declaration order; the engine reports violations in this
/// order, so it must stay stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Returns the schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a top-level field rule by name
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.rule)
    }

    /// Validates the schema declaration itself (not a payload).
    ///
    /// Checks for duplicate field names, empty enum sets, out-of-order
    /// bounds, and defaults on required fields, recursing into nested
    /// objects and array elements.
    pub fn validate_structure(&self) -> Result<(), String> {
        check_field_list(&self.fields)
            .map_err(|e| format!("schema '{}': {}", self.name, e))
    }
}

fn check_field_list(fields: &[Field]) -> Result<(), String> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(format!("duplicate field '{}'", field.name));
        }
        if field.rule.required && field.rule.default.is_some() {
            return Err(format!("required field '{}' declares a default", field.name));
        }
        field
            .rule
            .field_type
            .check_declaration()
            .map_err(|e| format!("field '{}': {}", field.name, e))?;
    }
    Ok(())
}
