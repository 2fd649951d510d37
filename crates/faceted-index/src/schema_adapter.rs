//! Projects a `Manifest` into a JSON Schema describing the query shape a
//! bundle accepts. Reads the manifest only — never items or posting lists.

use serde_json::{json, Map, Value};

use crate::{
    field::{FieldKind, ScalarType},
    manifest::Manifest,
};

#[must_use]
pub fn project(manifest: &Manifest) -> Value {
    let mut properties = Map::new();

    for field in &manifest.fields {
        let schema = match field.kind {
            FieldKind::Facet => facet_schema(field.scalar_type),
            FieldKind::Range => range_schema(),
            FieldKind::Alias | FieldKind::Id | FieldKind::Meta => scalar_schema(field.scalar_type),
        };
        properties.insert(field.name.clone(), schema);
    }

    properties.insert("limit".to_owned(), json!({"type": "integer"}));
    properties.insert("offset".to_owned(), json!({"type": "integer"}));
    properties.insert("includeFacetCounts".to_owned(), json!({"type": "boolean"}));
    properties.insert(
        "enrichAliases".to_owned(),
        json!({"anyOf": [{"type": "boolean"}, {"type": "array", "items": {"type": "string"}}]}),
    );

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": manifest.dataset_id,
        "type": "object",
        "properties": Value::Object(properties),
    })
}

fn scalar_schema(scalar_type: ScalarType) -> Value {
    match scalar_type {
        ScalarType::String | ScalarType::Date => json!({"type": "string"}),
        ScalarType::Number => json!({"type": "number"}),
        ScalarType::Boolean => json!({"type": "boolean"}),
    }
}

/// A facet property accepts either a single scalar or an array of them, per
/// the builder's own per-element indexing of array-valued facets.
fn facet_schema(scalar_type: ScalarType) -> Value {
    let single = scalar_schema(scalar_type);
    json!({"anyOf": [single.clone(), {"type": "array", "items": single}]})
}

fn range_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"min": {"type": "number"}, "max": {"type": "number"}},
    })
}
