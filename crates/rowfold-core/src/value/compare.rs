use crate::value::Value;

/// Largest power of two whose integral f64 values still fit in i128.
const F64_I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127

/// Structural equality used for identity decisions.
///
/// Rules:
/// 1. Numbers compare numerically across Int/Uint/Float64; NaN equals only NaN.
/// 2. Lists compare pairwise in order.
/// 3. Maps compare by key set and per-key value, ignoring insertion order.
/// 4. Mixed non-numeric variants are never equal.
#[must_use]
pub(crate) fn identity_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| identity_eq(a, b))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| identity_eq(value, other)))
        }
        _ if left.is_numeric() && right.is_numeric() => numeric_eq(left, right),
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numeric_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Float64(a), Value::Float64(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::Float64(f), other) | (other, Value::Float64(f)) => {
            float_as_i128(*f).is_some_and(|n| integer_as_i128(other) == Some(n))
        }
        _ => integer_as_i128(left) == integer_as_i128(right),
    }
}

/// Normalize numeric representation so identity-equal values also share one
/// encoding for hashing and stringification.
///
/// - non-negative Int becomes Uint
/// - integral Float64 in integer range becomes Int/Uint (-0.0 becomes 0)
/// - every NaN payload collapses to `f64::NAN`
#[must_use]
pub(crate) fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Int(i) => u64::try_from(*i).map_or(Value::Int(*i), Value::Uint),
        Value::Float64(f) if f.is_nan() => Value::Float64(f64::NAN),
        Value::Float64(f) => float_as_i128(*f)
            .and_then(integer_value)
            .unwrap_or(Value::Float64(*f)),
        Value::List(items) => Value::List(items.iter().map(canonicalize).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), canonicalize(value)))
                .collect(),
        ),
        Value::Bool(_) | Value::Null | Value::Text(_) | Value::Uint(_) => value.clone(),
    }
}

fn integer_as_i128(value: &Value) -> Option<i128> {
    match value {
        Value::Int(i) => Some(i128::from(*i)),
        Value::Uint(u) => Some(i128::from(*u)),
        _ => None,
    }
}

fn integer_value(n: i128) -> Option<Value> {
    u64::try_from(n)
        .map(Value::Uint)
        .or_else(|_| i64::try_from(n).map(Value::Int))
        .ok()
}

// Exact integral view of a float; None for fractions, NaN and infinities.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn float_as_i128(f: f64) -> Option<i128> {
    if !f.is_finite() || f.fract() != 0.0 || f.abs() >= F64_I128_LIMIT {
        return None;
    }

    Some(f as i128)
}
