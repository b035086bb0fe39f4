//! Single-field boolean predicates
//!
//! Quick checks usable without full schema validation. Every predicate is
//! total: wrong-typed or out-of-range input evaluates to `false`, never an
//! error. Patterns are permissive matches, not full RFC grammars.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::clean::strip_phone;

/// Currency codes accepted on money-bearing records
pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD", "AUD", "JPY"];

/// Upper bound on any price field, in currency units
pub const PRICE_CEILING: f64 = 10_000_000.0;

/// Oldest year accepted anywhere a year field appears
pub const YEAR_FLOOR: i64 = 1900;

lazy_static! {
    /// Permissive email shape: something@something.something, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Dialable number after formatting is stripped: optional `+`, 7-15 digits
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();

    /// http(s) URL
    static ref URL_REGEX: Regex = Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap();

    /// 24-character hexadecimal document identifier
    static ref OBJECT_ID_REGEX: Regex = Regex::new(r"^[0-9a-fA-F]{24}$").unwrap();
}

pub(crate) fn is_email(s: &str) -> bool {
    EMAIL_REGEX.is_match(s.trim())
}

pub(crate) fn is_phone(s: &str) -> bool {
    PHONE_REGEX.is_match(&strip_phone(s.trim()))
}

pub(crate) fn is_uri(s: &str) -> bool {
    URL_REGEX.is_match(s.trim())
}

pub(crate) fn is_object_id(s: &str) -> bool {
    OBJECT_ID_REGEX.is_match(s.trim())
}

/// Whether the value is a string with a plausible email shape
pub fn validate_email(value: &Value) -> bool {
    value.as_str().map(is_email).unwrap_or(false)
}

/// Whether the value is a string with a dialable phone number in it
pub fn validate_phone(value: &Value) -> bool {
    value.as_str().map(is_phone).unwrap_or(false)
}

/// Whether the value is one of the supported currency codes
pub fn validate_currency(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| SUPPORTED_CURRENCIES.contains(&s))
        .unwrap_or(false)
}

/// Whether the value is a 24-character hexadecimal document identifier
pub fn validate_object_id(value: &Value) -> bool {
    value.as_str().map(is_object_id).unwrap_or(false)
}

/// Whether the value is a positive number not exceeding the price ceiling
pub fn validate_price(value: &Value) -> bool {
    value
        .as_f64()
        .map(|n| n > 0.0 && n <= PRICE_CEILING)
        .unwrap_or(false)
}

/// Whether the value is an integer year between 1900 and one year past the
/// current calendar year, inclusive
pub fn validate_year(value: &Value) -> bool {
    value
        .as_i64()
        .map(|y| y >= YEAR_FLOOR && y <= i64::from(Utc::now().year()) + 1)
        .unwrap_or(false)
}
