//! Degraded Mode Tests
//!
//! With the rule engine absent, schema-bound validation becomes a
//! pass-through while the sanitization toolkit keeps working. The
//! availability flag is process-wide and set once, so these tests live in
//! their own test binary.

use dealdesk::sanitize::{sanitize_phone, validate_year};
use dealdesk::validator::{
    engine_availability, set_engine_availability, validate, EngineAvailability,
};
use serde_json::json;

#[test]
fn test_absent_engine_passes_everything_through() {
    set_engine_availability(EngineAvailability::Absent);
    assert_eq!(engine_availability(), EngineAvailability::Absent);

    // A payload that violates every customer rule comes back unchanged.
    let payload = json!({
        "name": 42,
        "email": "not-an-email",
        "unknown": {"deep": [null]}
    });
    assert_eq!(validate("customer.create", &payload).unwrap(), payload);

    // Even non-object payloads pass.
    let scalar = json!("just a string");
    assert_eq!(validate("invoice.create", &scalar).unwrap(), scalar);

    // Unknown schema names still fail: the lookup happens before the engine.
    assert!(validate("warehouse.create", &json!({})).is_err());

    // The flag is set-once; a later call cannot restore strictness.
    set_engine_availability(EngineAvailability::Present);
    assert_eq!(engine_availability(), EngineAvailability::Absent);

    // Sanitizers have no engine dependency and stay fully operational.
    assert_eq!(
        sanitize_phone(&json!("+1 (555) 000-1111")),
        json!("+15550001111")
    );
    assert!(validate_year(&json!(2005)));
}
