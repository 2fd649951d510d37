use super::*;

#[test]
fn build_config_error_messages_name_the_field() {
    let err = BuildConfigError::MissingAliasTarget {
        field: "zname".to_owned(),
    };
    assert_eq!(
        err.to_string(),
        "alias field 'zname' does not declare an alias target"
    );
}

#[test]
fn bundle_format_error_messages_name_the_version() {
    let err = BundleFormatError::UnsupportedVersion {
        version: "3.0.0".to_owned(),
    };
    assert!(err.to_string().contains("3.0.0"));
}
