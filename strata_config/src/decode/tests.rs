//! Unit tests for typed decoding and scalar coercion.

use rstest::rstest;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

use super::from_value;
use crate::error::StrataError;
use crate::value::Value;

#[derive(Debug, Deserialize, PartialEq)]
struct Connection {
    host: String,
    port: u16,
    secure: bool,
    timeout: Option<f64>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Nested {
    value: i32,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Outer {
    nested: Nested,
}

#[test]
fn decodes_native_scalars() {
    let tree = Value::from(json!({
        "host": "localhost",
        "port": 8080,
        "secure": true,
        "timeout": 1.5,
    }));
    let decoded: Connection = from_value(&tree).expect("decodes");
    assert_eq!(
        decoded,
        Connection {
            host: "localhost".to_owned(),
            port: 8080,
            secure: true,
            timeout: Some(1.5),
        },
    );
}

#[test]
fn coerces_string_scalars() {
    // Environment and CLI sources only ever produce strings.
    let tree = Value::from(json!({
        "host": "localhost",
        "port": "8080",
        "secure": "TRUE",
        "timeout": "2.5",
    }));
    let decoded: Connection = from_value(&tree).expect("decodes");
    assert_eq!(decoded.port, 8080);
    assert!(decoded.secure);
    assert_eq!(decoded.timeout, Some(2.5));
}

#[rstest]
#[case("1", true)]
#[case("true", true)]
#[case("TRUE", true)]
#[case("0", false)]
#[case("false", false)]
#[case("False", false)]
fn boolean_literals_coerce(#[case] text: &str, #[case] expected: bool) {
    let decoded: bool = from_value(&Value::from(text)).expect("coerces");
    assert_eq!(decoded, expected);
}

#[rstest]
#[case("3")]
#[case("yes")]
#[case("")]
fn bad_boolean_literals_are_rejected(#[case] text: &str) {
    let result: Result<bool, _> = from_value(&Value::from(text));
    let Err(StrataError::InvalidBooleanLiteral { value, .. }) = result else {
        panic!("expected InvalidBooleanLiteral");
    };
    assert_eq!(value, text);
}

#[test]
fn missing_required_field_names_the_full_path() {
    let tree = Value::from(json!({"nested": {}}));
    let result: Result<Outer, _> = from_value(&tree);
    let Err(StrataError::MissingRequiredField { path }) = result else {
        panic!("expected MissingRequiredField");
    };
    assert_eq!(path.to_string(), "nested.value");
}

#[test]
fn null_counts_as_missing_for_required_fields() {
    let tree = Value::from(json!({"nested": {"value": null}}));
    let result: Result<Outer, _> = from_value(&tree);
    assert!(matches!(result, Err(StrataError::MissingRequiredField { .. })));
}

#[test]
fn all_optional_record_decodes_from_nothing() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Sparse {
        first: Option<String>,
        second: Option<bool>,
    }
    #[derive(Debug, Deserialize, PartialEq)]
    struct Holder {
        inner: Sparse,
    }
    let decoded: Holder = from_value(&Value::from(json!({}))).expect("decodes");
    assert_eq!(decoded.inner, Sparse { first: None, second: None });
}

#[test]
fn missing_list_decodes_to_empty() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct WithList {
        items: Vec<String>,
    }
    let decoded: WithList = from_value(&Value::from(json!({}))).expect("decodes");
    assert!(decoded.items.is_empty());
}

#[test]
fn list_elements_report_their_index() {
    #[derive(Debug, Deserialize)]
    struct WithList {
        items: Vec<i64>,
    }
    let tree = Value::from(json!({"items": [1, "two", 3]}));
    let result: Result<WithList, _> = from_value(&tree);
    let Err(StrataError::TypeMismatch { path, .. }) = result else {
        panic!("expected TypeMismatch");
    };
    assert_eq!(path.to_string(), "items.1");
}

#[test]
fn null_elements_decode_into_optional_slots() {
    let tree = Value::from(json!([1, null, 3]));
    let decoded: Vec<Option<i64>> = from_value(&tree).expect("decodes");
    assert_eq!(decoded, vec![Some(1), None, Some(3)]);
}

#[test]
fn null_elements_fail_required_slots() {
    let tree = Value::from(json!([1, null, 3]));
    let result: Result<Vec<i64>, _> = from_value(&tree);
    let Err(StrataError::MissingRequiredField { path }) = result else {
        panic!("expected MissingRequiredField");
    };
    assert_eq!(path.to_string(), "1");
}

#[test]
fn integer_out_of_range_is_a_type_mismatch() {
    let result: Result<u8, _> = from_value(&Value::Integer(300));
    let Err(StrataError::TypeMismatch { expected, found, .. }) = result else {
        panic!("expected TypeMismatch");
    };
    assert_eq!(expected, "u8");
    assert_eq!(found, "300");
}

#[test]
fn floats_never_decode_into_integers() {
    let result: Result<i64, _> = from_value(&Value::Float(3.0));
    assert!(matches!(result, Err(StrataError::TypeMismatch { .. })));
}

#[test]
fn integers_widen_into_floats() {
    let decoded: f64 = from_value(&Value::Integer(4)).expect("widens");
    assert_eq!(decoded, 4.0);
}

#[test]
fn numbers_do_not_coerce_into_strings() {
    let result: Result<String, _> = from_value(&Value::Integer(7));
    assert!(matches!(result, Err(StrataError::TypeMismatch { .. })));
}

#[test]
fn unknown_source_keys_are_ignored() {
    let tree = Value::from(json!({"value": 1, "surplus": "x"}));
    let decoded: Nested = from_value(&tree).expect("decodes");
    assert_eq!(decoded, Nested { value: 1 });
}

#[test]
fn maps_collect_present_keys() {
    let tree = Value::from(json!({"a": 1, "b": 2}));
    let decoded: BTreeMap<String, i64> = from_value(&tree).expect("decodes");
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get("b"), Some(&2));
}

#[test]
fn enums_select_unit_variants_from_strings() {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Mode {
        Active,
        Passive,
    }
    let decoded: Mode = from_value(&Value::from("passive")).expect("decodes");
    assert_eq!(decoded, Mode::Passive);
}

#[test]
fn enums_select_struct_variants_from_single_key_objects() {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Backend {
        Memory,
        Disk { root: String },
    }
    let tree = Value::from(json!({"disk": {"root": "/var/lib"}}));
    let decoded: Backend = from_value(&tree).expect("decodes");
    assert_eq!(decoded, Backend::Disk { root: "/var/lib".to_owned() });
    let unit: Backend = from_value(&Value::from("memory")).expect("decodes");
    assert_eq!(unit, Backend::Memory);
}

#[test]
fn requesting_scalar_from_object_is_a_type_mismatch() {
    let tree = Value::from(json!({"value": {"x": 1}}));
    let result: Result<Nested, _> = from_value(&tree);
    let Err(StrataError::TypeMismatch { path, expected, found }) = result else {
        panic!("expected TypeMismatch");
    };
    assert_eq!(path.to_string(), "value");
    assert_eq!(expected, "i32");
    assert_eq!(found, "object");
}

#[test]
fn char_requires_a_single_character() {
    let decoded: char = from_value(&Value::from("x")).expect("decodes");
    assert_eq!(decoded, 'x');
    let result: Result<char, _> = from_value(&Value::from("xy"));
    assert!(matches!(result, Err(StrataError::TypeMismatch { .. })));
}

#[test]
fn custom_deserialize_errors_name_the_enclosing_field() {
    #[derive(Debug)]
    struct Percentage(u8);

    impl<'de> Deserialize<'de> for Percentage {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let raw = u8::deserialize(deserializer)?;
            if raw > 100 {
                return Err(serde::de::Error::custom("percentage above 100"));
            }
            Ok(Self(raw))
        }
    }

    #[derive(Debug, Deserialize)]
    struct Limits {
        threshold: Percentage,
    }

    #[derive(Debug, Deserialize)]
    struct Gauges {
        limits: Limits,
    }

    let tree = Value::from(json!({"limits": {"threshold": 150}}));
    let result: Result<Gauges, _> = from_value(&tree);
    let Err(StrataError::Decode { path, message }) = result else {
        panic!("expected Decode");
    };
    assert_eq!(path.to_string(), "limits.threshold");
    assert_eq!(message, "percentage above 100");

    let decoded: Gauges = from_value(&Value::from(json!({"limits": {"threshold": 75}})))
        .expect("decodes");
    assert_eq!(decoded.limits.threshold.0, 75);
}
