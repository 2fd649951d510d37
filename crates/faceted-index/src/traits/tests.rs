use super::*;

#[test]
fn json_value_field_access_reads_scalars() {
    let record = serde_json::json!({"status": "open", "priority": null, "tags": ["a", "b"]});
    assert_eq!(record.field("status"), Value::String("open".to_owned()));
    assert_eq!(record.field("priority"), Value::Null);
    assert_eq!(record.field("missing"), Value::Null);
    assert_eq!(
        record.field("tags"),
        Value::Array(vec![Value::String("a".to_owned()), Value::String("b".to_owned())])
    );
}

#[test]
fn json_value_field_access_stringifies_nested_objects_opaquely() {
    let record = serde_json::json!({"meta": {"a": 1}});
    let v = record.field("meta");
    assert!(v.as_str().is_some());
}

#[test]
fn json_value_attach_alias_inserts_array_of_strings() {
    let mut record = serde_json::json!({"zid": "Z-1"});
    record.attach_alias("zname", &["Zone A".to_owned()]);
    assert_eq!(record["zname"], serde_json::json!(["Zone A"]));
}
