//! Validation Invariant Tests
//!
//! End-to-end checks of the schema engine against the builtin registry:
//! - All violations are aggregated in one pass
//! - Violations follow schema declaration order
//! - Unknown fields are stripped, never reported
//! - Normalization is idempotent
//! - Nested paths use dot notation, array elements carry indices

use dealdesk::report::format_error;
use dealdesk::validator::{validate, registry, ValidationError};
use serde_json::json;

fn valid_customer() -> serde_json::Value {
    json!({
        "name": "Avery Motors Ltd",
        "email": "sales@averymotors.example",
        "phone": "+1 (555) 000-1111",
        "address": {
            "street": "22 Dock Road",
            "city": "Portsmouth",
            "postal_code": "PO1 3AX",
            "country": "GB"
        },
        "tags": ["fleet", "priority"]
    })
}

// =============================================================================
// Acceptance and Normalization
// =============================================================================

/// A fully valid payload comes back with every declared field intact.
#[test]
fn test_valid_customer_accepted() {
    let normalized = validate("customer.create", &valid_customer()).unwrap();
    assert_eq!(normalized["name"], json!("Avery Motors Ltd"));
    assert_eq!(normalized["address"]["city"], json!("Portsmouth"));
    assert_eq!(normalized["tags"], json!(["fleet", "priority"]));
}

/// Unknown fields are stripped from the output without producing violations,
/// at the top level and inside nested objects.
#[test]
fn test_unknown_fields_stripped_silently() {
    let mut payload = valid_customer();
    payload["loyalty_points"] = json!(250);
    payload["address"]["geohash"] = json!("gcpuuz");

    let normalized = validate("customer.create", &payload).unwrap();
    assert!(normalized.get("loyalty_points").is_none());
    assert!(normalized["address"].get("geohash").is_none());
}

/// Re-validating an accepted value yields the identical value.
#[test]
fn test_normalization_is_idempotent() {
    let mut payload = valid_customer();
    payload["extra"] = json!("dropped");

    let once = validate("customer.create", &payload).unwrap();
    let twice = validate("customer.create", &once).unwrap();
    assert_eq!(once, twice);
}

/// Numeric strings and whole floats coerce to the declared integer type.
#[test]
fn test_inventory_coercion() {
    let normalized = validate(
        "inventory.create",
        &json!({
            "sku": "axle-204",
            "name": "Rear axle assembly",
            "year": "2024",
            "price": "1499.5",
            "currency": "USD",
            "quantity": 3.0
        }),
    )
    .unwrap();

    assert_eq!(normalized["year"], json!(2024));
    assert_eq!(normalized["price"], json!(1499.5));
    assert_eq!(normalized["quantity"], json!(3));
}

/// Absent optional fields with defaults are filled in; the rest are dropped.
#[test]
fn test_pagination_defaults() {
    let normalized = validate("pagination", &json!({})).unwrap();
    assert_eq!(
        normalized,
        json!({"page": 1, "limit": 20, "order": "asc"})
    );

    let normalized = validate("pagination", &json!({"page": 4, "sort_by": "name"})).unwrap();
    assert_eq!(normalized["page"], json!(4));
    assert_eq!(normalized["limit"], json!(20));
    assert_eq!(normalized["sort_by"], json!("name"));
}

// =============================================================================
// Violation Aggregation and Ordering
// =============================================================================

/// Omitting one required field yields exactly one violation naming it.
#[test]
fn test_single_missing_field_single_violation() {
    let mut payload = valid_customer();
    payload.as_object_mut().unwrap().remove("email");

    let err = validate("customer.create", &payload).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "email");
    assert_eq!(violations[0].message, "is required");
}

/// Three independent problems are reported together, not one at a time.
#[test]
fn test_three_violations_aggregate() {
    let err = validate(
        "inventory.create",
        &json!({
            "sku": "axle-204",
            "name": "Rear axle assembly",
            "year": 1850,
            "price": 20_000_000.0,
            "currency": "bitcoin"
        }),
    )
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 3);
    assert_eq!(violations[0].field, "year");
    assert_eq!(violations[1].field, "price");
    assert_eq!(violations[2].field, "currency");
}

/// Violation order matches schema declaration order even when the payload
/// lists fields differently.
#[test]
fn test_violation_order_follows_declaration() {
    let err = validate(
        "alert.create",
        &json!({"level": "loud", "title": "", "message": ""}),
    )
    .unwrap_err();

    let fields: Vec<&str> = err
        .violations()
        .unwrap()
        .iter()
        .map(|v| v.field.as_str())
        .collect();
    assert_eq!(fields, ["title", "message", "level"]);
}

/// Deep violations carry full dot-notation paths with array indices.
#[test]
fn test_nested_violation_paths() {
    let err = validate(
        "invoice.create",
        &json!({
            "customer_id": "0123456789abcdef01234567",
            "currency": "EUR",
            "items": [
                {"sku": "axle-204", "quantity": 1, "unit_price": 99.0},
                {"sku": "hub-11", "quantity": 0, "unit_price": -5.0}
            ]
        }),
    )
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].field, "items[1].quantity");
    assert_eq!(violations[0].message, "must be at least 1");
    assert_eq!(violations[1].field, "items[1].unit_price");
    assert_eq!(violations[1].message, "must be at least 0");
}

/// An invoice needs at least one line item.
#[test]
fn test_invoice_requires_items() {
    let err = validate(
        "invoice.create",
        &json!({
            "customer_id": "0123456789abcdef01234567",
            "currency": "EUR",
            "items": []
        }),
    )
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations[0].field, "items");
    assert_eq!(violations[0].message, "must contain at least 1 item(s)");
}

/// A due date in the past is rejected against the clock at validation time.
#[test]
fn test_invoice_due_date_must_not_be_past() {
    let err = validate(
        "invoice.create",
        &json!({
            "customer_id": "0123456789abcdef01234567",
            "currency": "EUR",
            "items": [{"sku": "axle-204", "quantity": 1, "unit_price": 99.0}],
            "due_date": "2019-05-01T00:00:00Z"
        }),
    )
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations[0].field, "due_date");
    assert_eq!(violations[0].message, "must not be in the past");
}

// =============================================================================
// Presence Semantics
// =============================================================================

/// A whitespace-only optional phone marked empty-as-absent is dropped
/// instead of failing the format check.
#[test]
fn test_empty_as_absent_optional_field_dropped() {
    let mut payload = valid_customer();
    payload["phone"] = json!("   ");

    let normalized = validate("customer.create", &payload).unwrap();
    assert!(normalized.get("phone").is_none());
}

/// Update schemas accept partial payloads and inject no defaults.
#[test]
fn test_update_schema_accepts_partial_payload() {
    let normalized = validate("inventory.update", &json!({"price": 1299.0})).unwrap();
    assert_eq!(normalized, json!({"price": 1299.0}));
}

/// Nested requiredness does not relax on update: an address carried on an
/// update must still name its city.
#[test]
fn test_update_schema_keeps_nested_requiredness() {
    let err = validate(
        "customer.update",
        &json!({"address": {"street": "22 Dock Road"}}),
    )
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "address.city");
    assert_eq!(violations[0].message, "is required");
}

// =============================================================================
// Failure Kinds and Formatting
// =============================================================================

/// Unknown schema names are a distinct failure kind, not a rejection.
#[test]
fn test_unknown_schema_name() {
    let err = validate("warehouse.create", &json!({})).unwrap_err();
    assert!(matches!(err, ValidationError::SchemaNotFound(_)));
    assert_eq!(err.code(), "DESK_UNKNOWN_SCHEMA");
    assert!(err.violations().is_none());
}

/// A rejection formats into the stable error body with violations verbatim.
#[test]
fn test_rejection_formats_to_error_body() {
    let err = validate("customer.create", &json!({"email": "nope"})).unwrap_err();
    let body: serde_json::Value = serde_json::from_str(&format_error(&err).to_json()).unwrap();

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], json!("name"));
    assert_eq!(errors[1]["field"], json!("email"));
    assert_eq!(errors[1]["message"], json!("must be a valid email address"));
}

// =============================================================================
// Registry and Determinism
// =============================================================================

/// The registered set is exactly the builtin names.
#[test]
fn test_registry_names_are_fixed() {
    let names = registry().names();
    assert_eq!(names.len(), 16);
    assert!(names.contains(&"customer.create"));
    assert!(names.contains(&"invoice.update"));
    assert!(names.contains(&"pagination"));
    assert!(names.contains(&"search"));
}

/// Validation of the same payload is deterministic across repeated calls.
#[test]
fn test_repeated_validation_is_deterministic() {
    let payload = json!({"query": "  ", "page": 0});
    let first = validate("search", &payload).unwrap_err();
    for _ in 0..50 {
        let again = validate("search", &payload).unwrap_err();
        assert_eq!(first.violations().unwrap(), again.violations().unwrap());
    }
}
