//! Pipeline step 2: resolve alias-field constraints in `equal`/`notEqual`
//! into their canonical target field, fail-soft on unresolvable values.

use std::collections::BTreeMap;

use crate::{
    bundle::Bundle,
    diagnostics::{self, Warning},
    value::Value,
};

use super::normalize::Normalized;

pub(crate) fn resolve<T>(bundle: &Bundle<T>, normalized: &mut Normalized) {
    resolve_map(bundle, &mut normalized.equal, &mut normalized.or_null_fields);
    let mut no_or_null = Vec::new();
    resolve_map(bundle, &mut normalized.not_equal, &mut no_or_null);
}

fn resolve_map<T>(
    bundle: &Bundle<T>,
    map: &mut BTreeMap<String, Vec<Value>>,
    or_null_fields: &mut Vec<String>,
) {
    let alias_fields: Vec<String> = map
        .keys()
        .filter(|field| bundle.describe().is_alias(field))
        .cloned()
        .collect();

    for field in alias_fields {
        let Some(values) = map.remove(&field) else { continue };
        let target = bundle
            .describe()
            .alias_target(&field)
            .unwrap_or(field.as_str())
            .to_owned();

        if let Some(slot) = or_null_fields.iter_mut().find(|f| **f == field) {
            *slot = target.clone();
        }

        // A genuinely empty IN list is a real constraint (spec §4.3: matches
        // nothing), distinct from "had values but none resolved" below. Force
        // the canonical field to the same never-matching empty list rather
        // than dropping the constraint, even if it already holds other values.
        if values.is_empty() {
            map.insert(target, Vec::new());
            continue;
        }

        let mut resolved: Vec<String> = Vec::new();
        for value in &values {
            let Some(raw) = value.stringify_scalar() else { continue };
            match bundle.alias_lookup(&field, &raw) {
                Some(ids) => {
                    for id in ids {
                        if !resolved.iter().any(|r| r == id) {
                            resolved.push(id.clone());
                        }
                    }
                }
                None => diagnostics::warn(Warning::AliasValueUnresolved {
                    field: field.clone(),
                    value: raw,
                }),
            }
        }

        if resolved.is_empty() {
            diagnostics::warn(Warning::AliasConstraintDropped { field: field.clone() });
            or_null_fields.retain(|f| f != &target);
            continue;
        }

        let entry = map.entry(target).or_default();
        for id in resolved {
            let value = Value::String(id);
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
    }
}

#[cfg(test)]
mod tests;
