//! dealdesk - validation and sanitization core for business records
//!
//! Payloads (customers, dealers, companies, inventory items, listings,
//! invoices, alerts) are validated against named schemas before they reach
//! storage. Validation aggregates every violation in a single pass;
//! sanitizers and single-field predicates operate independently of the
//! schema engine and stay available even when it is disabled.

pub mod observability;
pub mod report;
pub mod sanitize;
pub mod validator;
