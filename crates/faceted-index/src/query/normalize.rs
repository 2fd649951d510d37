//! Pipeline step 1: split nulls out of `equal`/`notEqual` into `isNull`/
//! `isNotNull`, tracking which `equal` fields need the OR-null adjustment
//! (step 4) because their IN list mixed values with an explicit `null`.

use std::collections::BTreeMap;

use crate::value::Value;

use super::Query;

pub(crate) struct Normalized {
    pub equal: BTreeMap<String, Vec<Value>>,
    pub or_null_fields: Vec<String>,
    pub not_equal: BTreeMap<String, Vec<Value>>,
    pub is_null: Vec<String>,
    pub is_not_null: Vec<String>,
}

pub(crate) fn normalize(query: &Query) -> Normalized {
    let mut equal = BTreeMap::new();
    let mut or_null_fields = Vec::new();
    let mut is_null = query.is_null.clone();

    for (field, values) in &query.equal {
        let had_null = values.iter().any(Value::is_null);
        let non_null: Vec<Value> = values.iter().filter(|v| !v.is_null()).cloned().collect();

        if had_null && non_null.is_empty() {
            // Bare `null` (or a list of only nulls): pure isNull promotion.
            if !is_null.contains(field) {
                is_null.push(field.clone());
            }
        } else {
            if had_null {
                // IN ∪ {null}: OR-null adjustment unions the null-index set
                // into the candidate set at step 4.
                or_null_fields.push(field.clone());
            }
            equal.insert(field.clone(), non_null);
        }
    }

    let mut not_equal = BTreeMap::new();
    let mut is_not_null = query.is_not_null.clone();

    for (field, values) in &query.not_equal {
        let had_null = values.iter().any(Value::is_null);
        let non_null: Vec<Value> = values.iter().filter(|v| !v.is_null()).cloned().collect();

        if had_null && non_null.is_empty() {
            if !is_not_null.contains(field) {
                is_not_null.push(field.clone());
            }
        } else {
            if had_null && !is_not_null.contains(field) {
                is_not_null.push(field.clone());
            }
            not_equal.insert(field.clone(), non_null);
        }
    }

    Normalized {
        equal,
        or_null_fields,
        not_equal,
        is_null,
        is_not_null,
    }
}
