use super::*;
use crate::{diagnostics::NoopWarningSink, field::ScalarType};
use std::collections::BTreeMap as Map;

fn field_config(kind: FieldKind, scalar_type: ScalarType) -> crate::config::FieldConfig {
    crate::config::FieldConfig {
        kind,
        scalar_type,
        alias_target: None,
    }
}

fn items() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({"id": "1", "status": "open", "priority": "high"}),
        serde_json::json!({"id": "2", "status": "open", "priority": "low"}),
        serde_json::json!({"id": "3", "status": "closed", "priority": "high"}),
    ]
}

fn basic_config() -> BuildConfig {
    let mut fields = Map::new();
    fields.insert("status".to_owned(), field_config(FieldKind::Facet, ScalarType::String));
    fields.insert("priority".to_owned(), field_config(FieldKind::Facet, ScalarType::String));
    BuildConfig {
        dataset_id: "issues".to_owned(),
        fields,
        strict_scalar_typing: false,
    }
}

#[test]
fn build_fails_on_empty_field_set() {
    let config = BuildConfig {
        dataset_id: "empty".to_owned(),
        fields: Map::new(),
        strict_scalar_typing: false,
    };
    let err = Builder::build(items(), config).unwrap_err();
    assert_eq!(err, BuildConfigError::EmptyFieldSet);
}

#[test]
fn build_fails_on_alias_without_target() {
    let mut config = basic_config();
    config.fields.insert(
        "zname".to_owned(),
        field_config(FieldKind::Alias, ScalarType::String),
    );
    let err = Builder::build(items(), config).unwrap_err();
    assert_eq!(
        err,
        BuildConfigError::MissingAliasTarget {
            field: "zname".to_owned()
        }
    );
}

#[test]
fn build_fails_on_alias_target_missing() {
    let mut config = basic_config();
    let mut f = field_config(FieldKind::Alias, ScalarType::String);
    f.alias_target = Some("ghost".to_owned());
    config.fields.insert("zname".to_owned(), f);
    let err = Builder::build(items(), config).unwrap_err();
    assert_eq!(
        err,
        BuildConfigError::UnknownAliasTarget {
            field: "zname".to_owned(),
            target: "ghost".to_owned()
        }
    );
}

#[test]
fn build_fails_on_alias_target_wrong_kind() {
    let mut config = basic_config();
    config.fields.insert("note".to_owned(), field_config(FieldKind::Meta, ScalarType::String));
    let mut f = field_config(FieldKind::Alias, ScalarType::String);
    f.alias_target = Some("note".to_owned());
    config.fields.insert("zname".to_owned(), f);

    let err = Builder::build(items(), config).unwrap_err();
    assert!(matches!(err, BuildConfigError::InvalidAliasTargetKind { .. }));
}

#[test]
fn build_posting_lists_are_sorted_and_distinct() {
    let bundle = Builder::build(items(), basic_config()).unwrap();
    let open = bundle.facet_index().get("status").unwrap().get("open").unwrap();
    assert_eq!(open, &vec![0, 1]);
    assert!(open.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn unobserved_field_warns_but_does_not_fail() {
    let mut config = basic_config();
    config.fields.insert("severity".to_owned(), field_config(FieldKind::Facet, ScalarType::String));

    diagnostics::with_warning_sink(&NoopWarningSink, || {
        let result = Builder::build(items(), config);
        assert!(result.is_ok());
    });
}

#[test]
fn array_valued_facet_contributes_once_per_element() {
    let items = vec![serde_json::json!({"tags": ["a", "b", "a"]})];
    let mut fields = Map::new();
    fields.insert("tags".to_owned(), field_config(FieldKind::Facet, ScalarType::String));
    let config = BuildConfig {
        dataset_id: "d".to_owned(),
        fields,
        strict_scalar_typing: false,
    };
    let bundle = Builder::build(items, config).unwrap();
    let a = bundle.facet_index().get("tags").unwrap().get("a").unwrap();
    assert_eq!(a, &vec![0]); // posting list is still distinct per item index
}

#[test]
fn strict_scalar_typing_separates_number_and_string_keys() {
    let items = vec![
        serde_json::json!({"code": 1}),
        serde_json::json!({"code": "1"}),
    ];
    let mut fields = Map::new();
    fields.insert("code".to_owned(), field_config(FieldKind::Facet, ScalarType::String));
    let config = BuildConfig {
        dataset_id: "d".to_owned(),
        fields,
        strict_scalar_typing: true,
    };
    let bundle = Builder::build(items, config).unwrap();
    let postings = bundle.facet_index().get("code").unwrap();
    assert_eq!(postings.get("n:1"), Some(&vec![0]));
    assert_eq!(postings.get("s:1"), Some(&vec![1]));
}

#[test]
fn alias_lookup_tables_built_from_scalar_pairs() {
    let items = vec![
        serde_json::json!({"zid": "Z-1", "zname": "Zone A"}),
        serde_json::json!({"zid": "Z-2", "zname": "Zone B"}),
        serde_json::json!({"zid": "Z-1", "zname": "Zone A"}),
    ];
    let mut fields = Map::new();
    fields.insert("zid".to_owned(), field_config(FieldKind::Facet, ScalarType::String));
    let mut alias = field_config(FieldKind::Alias, ScalarType::String);
    alias.alias_target = Some("zid".to_owned());
    fields.insert("zname".to_owned(), alias);

    let config = BuildConfig {
        dataset_id: "d".to_owned(),
        fields,
        strict_scalar_typing: false,
    };
    let bundle = Builder::build(items, config).unwrap();
    let lookups = bundle.describe().lookups.as_ref().unwrap();
    let table = &lookups["zname"];
    assert_eq!(table.alias_to_ids["Zone A"], vec!["Z-1"]);
    assert_eq!(table.id_to_aliases["Z-1"], vec!["Zone A"]);
}
