use super::*;

#[test]
fn stringify_scalar_number_collides_with_string() {
    let n = Value::Number(123.0);
    let s = Value::String("123".to_owned());
    assert_eq!(n.stringify_scalar(), s.stringify_scalar());
}

#[test]
fn stringify_scalar_bool_forms() {
    assert_eq!(Value::Bool(true).stringify_scalar().as_deref(), Some("true"));
    assert_eq!(Value::Bool(false).stringify_scalar().as_deref(), Some("false"));
}

#[test]
fn stringify_scalar_null_is_none() {
    assert_eq!(Value::Null.stringify_scalar(), None);
}

#[test]
fn stringify_scalar_empty_string_is_valid_key() {
    assert_eq!(Value::String(String::new()).stringify_scalar().as_deref(), Some(""));
}

#[test]
fn format_number_drops_trailing_zero() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-2.0), "-2");
    assert_eq!(format_number(1.5), "1.5");
}
