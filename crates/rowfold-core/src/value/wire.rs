use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use std::collections::BTreeMap;

///
/// ValueWire
/// Serde decode shape accepting the natural self-describing data layout.
///

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueWire {
    Null,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Float64(f64),
    Text(String),
    List(Vec<Self>),
    Map(BTreeMap<String, Self>),
}

impl ValueWire {
    fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(v),
            Self::Uint(v) => Value::Uint(v),
            Self::Int(v) => Value::Int(v),
            Self::Float64(v) => Value::Float64(v),
            Self::Text(v) => Value::Text(v),
            Self::List(items) => Value::List(items.into_iter().map(Self::into_value).collect()),
            Self::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_value()))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueWire::deserialize(deserializer).map(ValueWire::into_value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Float64(v) => serializer.serialize_f64(*v),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::List(items) => items.serialize(serializer),
            Self::Map(entries) => entries.serialize(serializer),
            Self::Null => serializer.serialize_unit(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Uint(u) => serializer.serialize_u64(*u),
        }
    }
}

///
/// JSON
///

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => from_json_number(&n),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Non-finite floats have no JSON form and convert to `null`.
impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::Float64(v) => JsonNumber::from_f64(v).map_or(Self::Null, Self::Number),
            Value::Int(i) => Self::Number(i.into()),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect::<JsonMap<_, _>>(),
            ),
            Value::Null => Self::Null,
            Value::Text(s) => Self::String(s),
            Value::Uint(u) => Self::Number(u.into()),
        }
    }
}

fn from_json_number(n: &JsonNumber) -> Value {
    if let Some(u) = n.as_u64() {
        Value::Uint(u)
    } else if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else {
        Value::Float64(n.as_f64().unwrap_or(f64::NAN))
    }
}
