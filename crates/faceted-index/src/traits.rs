//! Record field access.
//!
//! This crate never parses records itself. Callers supply one `FieldAccess`
//! implementation per record type at build time; the builder and evaluator
//! read fields exclusively through it.

use crate::value::Value;

pub trait FieldAccess {
    /// Read a named field off this record. Returns `Value::Null` for a
    /// field that is absent or explicitly null — the evaluator does not
    /// distinguish "absent" from "null" (see spec §4.2/§4.3).
    fn field(&self, name: &str) -> Value;
}

/// Attach an enriched alias field back onto a materialized result item.
/// Implement this for your own record type to support `enrichAliases`;
/// types that never enrich can provide a no-op body.
pub trait Enrichable {
    fn attach_alias(&mut self, field: &str, values: &[String]);
}

impl Enrichable for serde_json::Value {
    fn attach_alias(&mut self, field: &str, values: &[String]) {
        if let Some(obj) = self.as_object_mut() {
            obj.insert(field.to_owned(), serde_json::json!(values));
        }
    }
}

impl FieldAccess for serde_json::Value {
    fn field(&self, name: &str) -> Value {
        self.get(name).map_or(Value::Null, json_to_value)
    }
}

fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
        serde_json::Value::Object(_) => {
            Value::String(serde_json::to_string(v).unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests;
