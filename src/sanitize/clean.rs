//! Input cleaners
//!
//! Normalizers for untrusted field values, applied before (or instead of)
//! schema validation. Every cleaner is total: a value of an unexpected type
//! is returned unchanged, never an error.

use serde_json::Value;

/// Trims surrounding whitespace and strips the markup delimiters `<` and
/// `>`. Non-string input is returned unchanged.
pub fn sanitize_string(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => Value::String(s.trim().chars().filter(|c| *c != '<' && *c != '>').collect()),
        None => value.clone(),
    }
}

/// Lower-cases and trims. Non-string input is returned unchanged.
pub fn sanitize_email(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => Value::String(s.trim().to_lowercase()),
        None => value.clone(),
    }
}

/// Strips everything except digits and a single leading `+`. Non-string
/// input is returned unchanged.
pub fn sanitize_phone(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => Value::String(strip_phone(s.trim())),
        None => value.clone(),
    }
}

/// Parses a price given as text (stripping separators), then rounds to
/// cents. Numeric input is rounded in place; anything else is returned
/// unchanged.
pub fn sanitize_price(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => to_cents(n).unwrap_or_else(|| value.clone()),
                _ => value.clone(),
            }
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => to_cents(f).unwrap_or_else(|| value.clone()),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn to_cents(n: f64) -> Option<Value> {
    serde_json::Number::from_f64((n * 100.0).round() / 100.0).map(Value::Number)
}

/// Keeps digits and a leading `+`, drops everything else.
pub(crate) fn strip_phone(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            out.push(c);
        }
    }
    out
}
