//! Unit tests for value accessors, conversions, and lookups.

use rstest::rstest;
use serde_json::json;

use super::{Dict, Lookup, Value};

#[rstest]
#[case(Value::Null, "null")]
#[case(Value::Bool(true), "boolean")]
#[case(Value::Integer(7), "integer")]
#[case(Value::Float(1.5), "float")]
#[case(Value::String("x".to_owned()), "string")]
#[case(Value::Array(Vec::new()), "array")]
#[case(Value::Object(Dict::new()), "object")]
fn kind_names_every_variant(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(value.kind(), expected);
}

#[test]
fn accessors_return_payloads() {
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::Integer(42).as_integer(), Some(42));
    assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
    assert_eq!(Value::from("hi").as_str(), Some("hi"));
    assert!(Value::Null.as_bool().is_none());
    assert!(Value::Bool(false).as_integer().is_none());
}

#[test]
fn get_walks_object_fields() {
    let tree = Value::from(json!({"server": {"port": 80}}));
    let port = tree.get("server").and_then(|server| server.get("port"));
    assert_eq!(port, Some(&Value::Integer(80)));
    assert!(tree.get("missing").is_none());
    assert!(Value::Integer(1).get("server").is_none());
}

#[test]
fn json_null_maps_to_null() {
    assert_eq!(Value::from(json!(null)), Value::Null);
}

#[test]
fn json_numbers_prefer_integers() {
    assert_eq!(Value::from(json!(12)), Value::Integer(12));
    assert_eq!(Value::from(json!(-3)), Value::Integer(-3));
    assert_eq!(Value::from(json!(0.25)), Value::Float(0.25));
}

#[test]
fn json_integers_beyond_i64_degrade_to_float() {
    let huge = serde_json::Value::from(u64::MAX);
    assert!(matches!(Value::from(huge), Value::Float(_)));
}

#[test]
fn json_round_trip_preserves_structure() {
    let source = json!({
        "name": "demo",
        "threshold": 0.75,
        "retries": 3,
        "tags": ["a", "b"],
        "nested": {"flag": true, "gap": null},
    });
    let tree = Value::from(source.clone());
    assert_eq!(serde_json::Value::from(tree), source);
}

#[test]
fn deserializes_from_json_text() {
    let parsed: Value =
        serde_json::from_str(r#"{"list": [1, null, "x"]}"#).expect("valid JSON");
    let expected = Value::from(json!({"list": [1, null, "x"]}));
    assert_eq!(parsed, expected);
}

#[test]
fn serializes_back_to_json_text() {
    let tree = Value::from(json!({"a": [true, 2]}));
    let text = serde_json::to_string(&tree).expect("serializable tree");
    assert_eq!(text, r#"{"a":[true,2]}"#);
}

#[test]
fn dict_deserializes_directly() {
    let entries: Dict =
        serde_json::from_str(r#"{"host": "localhost"}"#).expect("object root");
    assert_eq!(entries.get("host"), Some(&Value::from("localhost")));
}

#[rstest]
#[case(None, Lookup::Absent)]
#[case(Some(&Value::Null), Lookup::Null)]
#[case(Some(&Value::Bool(true)), Lookup::Present(&Value::Bool(true)))]
fn lookup_classifies_options(#[case] input: Option<&Value>, #[case] expected: Lookup<'_>) {
    assert_eq!(Lookup::from(input), expected);
}

#[test]
fn lookup_value_only_for_present() {
    assert!(Lookup::Absent.value().is_none());
    assert!(Lookup::Null.value().is_none());
    let held = Value::Integer(1);
    assert_eq!(Lookup::Present(&held).value(), Some(&held));
    assert!(Lookup::Null.is_vacant());
    assert!(!Lookup::Present(&held).is_vacant());
}

#[test]
fn into_object_unwraps_objects_only() {
    let entries = Value::from(json!({"k": 1})).into_object().expect("object");
    assert_eq!(entries.get("k"), Some(&Value::Integer(1)));
    assert!(Value::Null.into_object().is_none());
}
