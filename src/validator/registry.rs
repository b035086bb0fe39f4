//! Builtin schema registry
//!
//! One schema per entity operation, fixed at process start. Every entity
//! gets a `<entity>.create` schema and a derived `<entity>.update` schema
//! in which all top-level fields are optional and defaults are dropped
//! (partial updates must not invent values). Requiredness never cascades
//! into nested schemas; an update still enforces the nested rules of any
//! field it does carry.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::json;

use crate::observability::Logger;

use super::types::{Field, FieldRule, FieldType, Schema};

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Returns the process-wide registry, built on first use.
pub fn registry() -> &'static SchemaRegistry {
    REGISTRY.get_or_init(|| {
        let registry = SchemaRegistry::builtin();
        Logger::info(
            "SCHEMA_REGISTRY_READY",
            &[("schemas", &registry.len().to_string())],
        );
        registry
    })
}

/// Immutable mapping from schema name to schema.
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Builds the full builtin schema set.
    pub fn builtin() -> Self {
        let mut registry = Self {
            schemas: HashMap::new(),
        };

        registry.add_entity("customer", customer_fields());
        registry.add_entity("dealer", dealer_fields());
        registry.add_entity("company", company_fields());
        registry.add_entity("inventory", inventory_fields());
        registry.add_entity("listing", listing_fields());
        registry.add_entity("invoice", invoice_fields());
        registry.add_entity("alert", alert_fields());

        registry.insert(pagination_schema());
        registry.insert(search_schema());

        registry
    }

    /// Looks up a schema by name.
    ///
    /// `None` means the caller asked for an unregistered name, which is a
    /// programming mistake rather than a user-input problem.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered schema names, sorted for deterministic listings
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registers `<entity>.create` with the given fields and derives
    /// `<entity>.update` from them.
    fn add_entity(&mut self, entity: &str, fields: Vec<Field>) {
        let update = Schema::new(format!("{entity}.update"), relax(&fields));
        let create = Schema::new(format!("{entity}.create"), fields);
        self.insert(create);
        self.insert(update);
    }

    fn insert(&mut self, schema: Schema) {
        let replaced = self.schemas.insert(schema.name().to_string(), schema);
        debug_assert!(replaced.is_none(), "duplicate schema registration");
    }
}

/// Update variant of a create field list: every top-level field optional,
/// defaults removed. Nested schemas are left untouched.
fn relax(fields: &[Field]) -> Vec<Field> {
    fields
        .iter()
        .map(|f| {
            let mut rule = f.rule.clone();
            rule.required = false;
            rule.default = None;
            Field::new(f.name.clone(), rule)
        })
        .collect()
}

fn address_fields() -> Vec<Field> {
    vec![
        Field::new("street", FieldRule::optional(FieldType::text(1, 200))),
        Field::new("city", FieldRule::required(FieldType::text(1, 100))),
        Field::new("state", FieldRule::optional(FieldType::text(1, 100))),
        Field::new("postal_code", FieldRule::optional(FieldType::text(1, 20))),
        Field::new("country", FieldRule::optional(FieldType::text(2, 56))),
    ]
}

fn customer_fields() -> Vec<Field> {
    vec![
        Field::new("name", FieldRule::required(FieldType::text(1, 120))),
        Field::new("email", FieldRule::required(FieldType::email())),
        Field::new(
            "phone",
            FieldRule::optional(FieldType::phone()).empty_as_absent(),
        ),
        Field::new("company_id", FieldRule::optional(FieldType::object_id())),
        Field::new(
            "address",
            FieldRule::optional(FieldType::object(address_fields())),
        ),
        Field::new(
            "tags",
            FieldRule::optional(FieldType::array_bounded(FieldType::text(1, 50), 0, 20)),
        ),
        Field::new(
            "notes",
            FieldRule::optional(FieldType::text(1, 2000)).empty_as_absent(),
        ),
    ]
}

fn dealer_fields() -> Vec<Field> {
    vec![
        Field::new("name", FieldRule::required(FieldType::text(1, 120))),
        Field::new("email", FieldRule::required(FieldType::email())),
        Field::new(
            "phone",
            FieldRule::optional(FieldType::phone()).empty_as_absent(),
        ),
        Field::new("company_id", FieldRule::required(FieldType::object_id())),
        Field::new("region", FieldRule::optional(FieldType::text(1, 100))),
        Field::new(
            "currency",
            FieldRule::optional(FieldType::currency()).with_default(json!("USD")),
        ),
    ]
}

fn company_fields() -> Vec<Field> {
    vec![
        Field::new("name", FieldRule::required(FieldType::text(1, 160))),
        Field::new(
            "website",
            FieldRule::optional(FieldType::uri()).empty_as_absent(),
        ),
        Field::new("email", FieldRule::optional(FieldType::email())),
        Field::new(
            "phone",
            FieldRule::optional(FieldType::phone()).empty_as_absent(),
        ),
        Field::new(
            "address",
            FieldRule::optional(FieldType::object(address_fields())),
        ),
    ]
}

fn inventory_fields() -> Vec<Field> {
    vec![
        Field::new("sku", FieldRule::required(FieldType::text(1, 64))),
        Field::new("name", FieldRule::required(FieldType::text(1, 160))),
        Field::new("description", FieldRule::optional(FieldType::text(1, 4000))),
        Field::new("year", FieldRule::required(FieldType::year())),
        Field::new("price", FieldRule::required(FieldType::price())),
        Field::new("currency", FieldRule::required(FieldType::currency())),
        Field::new(
            "quantity",
            FieldRule::optional(FieldType::integer_at_least(0)).with_default(json!(0)),
        ),
        Field::new(
            "status",
            FieldRule::optional(FieldType::one_of(&["available", "reserved", "sold"]))
                .with_default(json!("available")),
        ),
        Field::new("dealer_id", FieldRule::optional(FieldType::object_id())),
    ]
}

fn listing_fields() -> Vec<Field> {
    vec![
        Field::new("title", FieldRule::required(FieldType::text(1, 160))),
        Field::new("description", FieldRule::optional(FieldType::text(1, 4000))),
        Field::new("dealer_id", FieldRule::required(FieldType::object_id())),
        Field::new("inventory_id", FieldRule::required(FieldType::object_id())),
        Field::new("price", FieldRule::required(FieldType::price())),
        Field::new("currency", FieldRule::required(FieldType::currency())),
        Field::new(
            "photos",
            FieldRule::optional(FieldType::array_bounded(FieldType::uri(), 0, 24)),
        ),
        Field::new(
            "published",
            FieldRule::optional(FieldType::boolean()).with_default(json!(false)),
        ),
    ]
}

fn invoice_item_fields() -> Vec<Field> {
    vec![
        Field::new("sku", FieldRule::required(FieldType::text(1, 64))),
        Field::new("description", FieldRule::optional(FieldType::text(1, 500))),
        Field::new("quantity", FieldRule::required(FieldType::integer_at_least(1))),
        Field::new("unit_price", FieldRule::required(FieldType::price())),
    ]
}

fn invoice_fields() -> Vec<Field> {
    vec![
        Field::new("customer_id", FieldRule::required(FieldType::object_id())),
        Field::new("dealer_id", FieldRule::optional(FieldType::object_id())),
        Field::new("currency", FieldRule::required(FieldType::currency())),
        Field::new(
            "items",
            FieldRule::required(FieldType::array_bounded(
                FieldType::object(invoice_item_fields()),
                1,
                100,
            )),
        ),
        Field::new("due_date", FieldRule::optional(FieldType::future_date())),
        Field::new("issued_at", FieldRule::optional(FieldType::date())),
        Field::new(
            "notes",
            FieldRule::optional(FieldType::text(1, 2000)).empty_as_absent(),
        ),
    ]
}

fn alert_fields() -> Vec<Field> {
    vec![
        Field::new("title", FieldRule::required(FieldType::text(1, 160))),
        Field::new("message", FieldRule::required(FieldType::text(1, 2000))),
        Field::new(
            "level",
            FieldRule::required(FieldType::one_of(&["info", "warning", "critical"])),
        ),
        Field::new("record_id", FieldRule::optional(FieldType::object_id())),
        Field::new("expires_at", FieldRule::optional(FieldType::future_date())),
    ]
}

fn pagination_schema() -> Schema {
    Schema::new(
        "pagination",
        vec![
            Field::new(
                "page",
                FieldRule::optional(FieldType::integer_at_least(1)).with_default(json!(1)),
            ),
            Field::new(
                "limit",
                FieldRule::optional(FieldType::integer_between(1, 100)).with_default(json!(20)),
            ),
            Field::new("sort_by", FieldRule::optional(FieldType::text(1, 64))),
            Field::new(
                "order",
                FieldRule::optional(FieldType::one_of(&["asc", "desc"]))
                    .with_default(json!("asc")),
            ),
        ],
    )
}

fn search_schema() -> Schema {
    Schema::new(
        "search",
        vec![
            Field::new("query", FieldRule::required(FieldType::text(1, 200))),
            Field::new(
                "page",
                FieldRule::optional(FieldType::integer_at_least(1)).with_default(json!(1)),
            ),
            Field::new(
                "limit",
                FieldRule::optional(FieldType::integer_between(1, 100)).with_default(json!(20)),
            ),
        ],
    )
}
