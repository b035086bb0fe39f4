//! Sanitization toolkit
//!
//! Stateless cleaners and single-field predicates for untrusted input.
//! Nothing here depends on the schema engine or its availability flag, and
//! nothing here ever fails: unexpected input is returned unchanged or
//! evaluates to `false`.

pub mod checks;
mod clean;

pub use checks::{
    validate_currency, validate_email, validate_object_id, validate_phone, validate_price,
    validate_year, PRICE_CEILING, SUPPORTED_CURRENCIES, YEAR_FLOOR,
};
pub use clean::{sanitize_email, sanitize_phone, sanitize_price, sanitize_string};
