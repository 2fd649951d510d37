use std::cell::RefCell;
use std::collections::BTreeMap;

use super::*;
use crate::{
    builder::Builder,
    config::{BuildConfig, FieldConfig},
    diagnostics::{with_warning_sink, WarningSink},
    field::{FieldKind, ScalarType},
    query::normalize::normalize,
    query::Query,
};

struct CapturingSink(RefCell<Vec<Warning>>);

impl WarningSink for CapturingSink {
    fn record(&self, warning: Warning) {
        self.0.borrow_mut().push(warning);
    }
}

fn sample_bundle() -> Bundle<serde_json::Value> {
    let mut fields = BTreeMap::new();
    fields.insert(
        "zid".to_owned(),
        FieldConfig {
            kind: FieldKind::Facet,
            scalar_type: ScalarType::String,
            alias_target: None,
        },
    );
    fields.insert(
        "zname".to_owned(),
        FieldConfig {
            kind: FieldKind::Alias,
            scalar_type: ScalarType::String,
            alias_target: Some("zid".to_owned()),
        },
    );

    let items = vec![
        serde_json::json!({"zid": "Z1", "zname": "Zone A"}),
        serde_json::json!({"zid": "Z2", "zname": "Zone B"}),
    ];

    Builder::build(
        items,
        BuildConfig {
            dataset_id: "ds".to_owned(),
            fields,
            strict_scalar_typing: false,
        },
    )
    .unwrap()
}

#[test]
fn resolves_alias_equal_constraint_to_target_field() {
    let bundle = sample_bundle();
    let query = Query::new().with_equal("zname", vec![Value::String("Zone A".to_owned())]);
    let mut normalized = normalize(&query);
    resolve(&bundle, &mut normalized);

    assert!(!normalized.equal.contains_key("zname"));
    assert_eq!(normalized.equal["zid"], vec![Value::String("Z1".to_owned())]);
}

#[test]
fn unresolved_value_is_warned_and_dropped() {
    let bundle = sample_bundle();
    let query = Query::new().with_equal("zname", vec![Value::String("Zone A".to_owned()), Value::String("Nowhere".to_owned())]);
    let mut normalized = normalize(&query);

    let sink = CapturingSink(RefCell::new(Vec::new()));
    with_warning_sink(&sink, || resolve(&bundle, &mut normalized));

    assert_eq!(normalized.equal["zid"], vec![Value::String("Z1".to_owned())]);
    assert!(sink
        .0
        .borrow()
        .iter()
        .any(|w| matches!(w, Warning::AliasValueUnresolved { field, value } if field == "zname" && value == "Nowhere")));
}

#[test]
fn fully_unresolved_constraint_is_dropped_entirely() {
    let bundle = sample_bundle();
    let query = Query::new().with_equal("zname", vec![Value::String("Nowhere".to_owned())]);
    let mut normalized = normalize(&query);

    let sink = CapturingSink(RefCell::new(Vec::new()));
    with_warning_sink(&sink, || resolve(&bundle, &mut normalized));

    assert!(!normalized.equal.contains_key("zname"));
    assert!(!normalized.equal.contains_key("zid"));
    assert!(sink
        .0
        .borrow()
        .iter()
        .any(|w| matches!(w, Warning::AliasConstraintDropped { field } if field == "zname")));
}

#[test]
fn empty_in_list_on_alias_field_forces_canonical_field_to_empty_constraint() {
    let bundle = sample_bundle();
    let query = Query::new().with_equal("zname", Vec::new());
    let mut normalized = normalize(&query);

    let sink = CapturingSink(RefCell::new(Vec::new()));
    with_warning_sink(&sink, || resolve(&bundle, &mut normalized));

    assert!(!normalized.equal.contains_key("zname"));
    assert_eq!(normalized.equal["zid"], Vec::<Value>::new());
    assert!(!sink
        .0
        .borrow()
        .iter()
        .any(|w| matches!(w, Warning::AliasConstraintDropped { .. })));
}

#[test]
fn non_alias_fields_pass_through_untouched() {
    let bundle = sample_bundle();
    let query = Query::new().with_equal("zid", vec![Value::String("Z1".to_owned())]);
    let mut normalized = normalize(&query);
    resolve(&bundle, &mut normalized);
    assert_eq!(normalized.equal["zid"], vec![Value::String("Z1".to_owned())]);
}
