use super::*;

#[test]
fn range_field_exposes_between_gte_lte() {
    let f = Field::new("createdAt", FieldKind::Range, ScalarType::Date);
    assert_eq!(f.ops, vec![FieldOp::Between, FieldOp::Gte, FieldOp::Lte]);
}

#[test]
fn facet_field_exposes_eq_in() {
    let f = Field::new("status", FieldKind::Facet, ScalarType::String);
    assert_eq!(f.ops, vec![FieldOp::Eq, FieldOp::In]);
}

#[test]
fn alias_field_carries_target() {
    let f = Field::new("zname", FieldKind::Alias, ScalarType::String).with_alias_target("zid");
    assert_eq!(f.alias_target.as_deref(), Some("zid"));
}
