//! Observability for the validation core
//!
//! Structured JSON logging only. Logging is read-only with respect to
//! validation: it never affects an outcome, runs synchronously, and spawns
//! no background work.

mod logger;

pub use logger::{Logger, Severity};
