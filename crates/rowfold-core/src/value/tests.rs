use crate::value::{Value, ValueTag};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn map(entries: &[(&str, Value)]) -> Value {
    Value::from_map(entries.iter().cloned())
}

// ---- equality ----------------------------------------------------------

#[test]
fn identity_eq_unifies_numeric_variants() {
    assert_eq!(Value::Int(1), Value::Uint(1));
    assert_eq!(Value::Uint(1), Value::Float64(1.0));
    assert_eq!(Value::Int(-2), Value::Float64(-2.0));
    assert_ne!(Value::Int(-1), Value::Uint(u64::MAX));
    assert_ne!(Value::Float64(1.5), Value::Uint(1));
}

#[test]
fn identity_eq_matches_nan_only_with_nan() {
    let nan = Value::Float64(f64::NAN);
    let other_nan = Value::Float64(f64::from_bits(0x7ff8_0000_0000_0001));
    assert!(Value::identity_eq(&nan, &nan));
    assert!(Value::identity_eq(&nan, &other_nan));
    assert!(!Value::identity_eq(&nan, &Value::Float64(0.0)));
    assert!(!Value::identity_eq(&nan, &Value::Null));
}

#[test]
fn canonicalize_collapses_nan_payloads() {
    let other_nan = Value::Float64(f64::from_bits(0x7fff_ffff_ffff_ffff));
    let Value::Float64(f) = other_nan.canonicalize() else {
        panic!("NaN should stay a float");
    };
    assert_eq!(f.to_bits(), f64::NAN.to_bits());
}

#[test]
fn identity_eq_keeps_list_order_but_ignores_map_order() {
    assert_ne!(
        Value::from_list(vec![1u64, 2]),
        Value::from_list(vec![2u64, 1])
    );
    assert_eq!(
        map(&[("name", v_txt("a")), ("role", v_txt("user"))]),
        map(&[("role", v_txt("user")), ("name", v_txt("a"))]),
    );
}

#[test]
fn identity_eq_rejects_maps_with_extra_keys() {
    let small = map(&[("a", Value::Uint(1))]);
    let large = map(&[("a", Value::Uint(1)), ("b", Value::Null)]);
    assert_ne!(small, large);
    assert_ne!(large, small);
}

#[test]
fn identity_eq_separates_text_from_numbers_and_null() {
    assert_ne!(v_txt("1"), Value::Uint(1));
    assert_ne!(v_txt("null"), Value::Null);
    assert_ne!(Value::Bool(false), Value::Null);
}

#[test]
fn canonicalize_folds_integral_numbers_to_integers() {
    let canonical = Value::List(vec![
        Value::Int(3),
        Value::Float64(-0.0),
        Value::Float64(-7.0),
        Value::Float64(2.5),
    ])
    .canonicalize();

    let Value::List(items) = canonical else {
        panic!("canonical list expected");
    };
    assert!(matches!(items[0], Value::Uint(3)));
    assert!(matches!(items[1], Value::Uint(0)));
    assert!(matches!(items[2], Value::Int(-7)));
    assert!(matches!(items[3], Value::Float64(f) if (f - 2.5).abs() < f64::EPSILON));
}

// ---- display -----------------------------------------------------------

#[test]
fn display_renders_json_with_sorted_keys() {
    let value = map(&[
        ("z", Value::from_list(vec![Value::Uint(1), Value::Null])),
        ("a", v_txt("quote\"d")),
    ]);
    assert_eq!(value.to_string(), r#"{"a":"quote\"d","z":[1,null]}"#);
}

#[test]
fn display_renders_non_finite_floats() {
    assert_eq!(Value::Float64(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Float64(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Float64(f64::NEG_INFINITY).to_string(), "-Infinity");
}

// ---- access ------------------------------------------------------------

#[test]
fn accessors_match_only_their_variant() {
    let value = map(&[("name", v_txt("a")), ("tags", Value::from_list(vec!["x"]))]);

    assert!(!value.is_scalar());
    assert!(value["name"].is_scalar());
    assert!(Value::Null.is_scalar());
    assert_eq!(value["name"].as_text(), Some("a"));
    assert_eq!(value["tags"].as_text(), None);
    assert_eq!(value.as_map().map(BTreeMap::len), Some(2));
    assert_eq!(value["name"].as_map(), None);
}

#[test]
fn index_returns_null_for_missing_fields() {
    let row = map(&[("id", Value::Uint(1))]);
    assert_eq!(row["id"], Value::Uint(1));
    assert!(row["missing"].is_null());
    assert!(Value::Uint(1)["id"].is_null());
}

#[test]
fn kind_label_follows_canonical_tag() {
    assert_eq!(Value::Null.canonical_tag(), ValueTag::Null);
    assert_eq!(v_txt("x").kind_label(), "Text");
    assert_eq!(Value::Map(BTreeMap::new()).kind_label(), "Map");
}

// ---- serde -------------------------------------------------------------

#[test]
fn json_conversion_preserves_shape() {
    let json = json!({
        "id": 1,
        "delta": -4,
        "ratio": 0.5,
        "tags": ["a", null, true],
    });

    let value = Value::from(json.clone());
    assert!(matches!(value["id"], Value::Uint(1)));
    assert!(matches!(value["delta"], Value::Int(-4)));
    assert_eq!(serde_json::Value::from(value), json);
}

#[test]
fn deserialize_reads_natural_layout() {
    let value: Value =
        serde_json::from_str(r#"{"id":7,"friends":[{"name":"b"}],"note":null}"#).expect("decode");

    assert_eq!(value["id"], Value::Uint(7));
    assert_eq!(value["friends"], Value::List(vec![map(&[("name", v_txt("b"))])]));
    assert!(value["note"].is_null());
    assert_eq!(
        serde_json::to_string(&value).expect("encode"),
        r#"{"friends":[{"name":"b"}],"id":7,"note":null}"#,
    );
}

#[test]
fn non_finite_floats_convert_to_json_null() {
    assert_eq!(
        serde_json::Value::from(Value::Float64(f64::NAN)),
        serde_json::Value::Null
    );
}

// ---- properties --------------------------------------------------------

fn arb_scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1_000i32..1_000).prop_map(|n| Value::Float64(f64::from(n) / 4.0)),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9]{0,6}".prop_map(Value::Text),
        Just(Value::Null),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar_value().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map("[a-c]", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn canonicalize_preserves_identity(value in arb_value()) {
        prop_assert_eq!(value.canonicalize(), value);
    }

    #[test]
    fn identity_eq_is_symmetric(left in arb_value(), right in arb_value()) {
        prop_assert_eq!(
            Value::identity_eq(&left, &right),
            Value::identity_eq(&right, &left)
        );
    }

    #[test]
    fn canonical_display_agrees_with_identity(left in arb_value(), right in arb_value()) {
        if left == right {
            prop_assert_eq!(left.canonicalize().to_string(), right.canonicalize().to_string());
        }
    }
}
