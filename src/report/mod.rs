//! User-facing failure formatting
//!
//! Turns validation failures into the stable body the transport layer
//! serializes back to clients. Formatting never fails.

mod formatter;

pub use formatter::{format_error, format_failure, ErrorBody};
