mod compare;
mod hash;
mod tag;
mod wire;

#[cfg(test)]
mod tests;

use std::{collections::BTreeMap, fmt, ops::Index};

// re-exports
pub(crate) use hash::hash_value;
pub use tag::ValueTag;

static NULL: Value = Value::Null;

///
/// Value
///
/// Plain data model shared by rows, identity keys, scalar fields and
/// materialized output.
///
/// Null        → an explicit null; absence is `Option::None`, never a variant.
/// Int/Uint    → compare numerically with each other and with Float64.
///

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Float64(f64),
    Int(i64),
    /// Ordered list of values.
    /// List order is significant for equality, hashing and output.
    List(Vec<Self>),
    /// Unordered string-keyed map.
    ///
    /// - Equality ignores insertion order.
    /// - Serialization emits keys in sorted order.
    Map(BTreeMap<String, Self>),
    Null,
    Text(String),
    Uint(u64),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map` from owned name/value entries.
    ///
    /// Later duplicate names replace earlier ones.
    pub fn from_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Float64(_) | Self::Int(_) | Self::Uint(_))
    }

    /// Returns true for values without nested structure.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Stable canonical variant tag used by hash encodings.
    #[must_use]
    pub const fn canonical_tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    /// Human-readable kind label for diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        self.canonical_tag().label()
    }

    ///
    /// ACCESSORS
    ///

    /// Look up one map field; `None` for missing fields and non-map values.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&Vec<Self>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    ///
    /// EQUALITY
    ///

    /// Structural identity equality used by every merge decision.
    #[must_use]
    pub fn identity_eq(left: &Self, right: &Self) -> bool {
        compare::identity_eq(left, right)
    }

    /// Normalize numeric representation so equal values share one encoding.
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        compare::canonicalize(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare::identity_eq(self, other)
    }
}

impl Index<&str> for Value {
    type Output = Self;

    /// Missing fields and non-map values index to `Null`.
    fn index(&self, name: &str) -> &Self::Output {
        self.get(name).unwrap_or(&NULL)
    }
}

///
/// Display
///
/// JSON rendering; maps render with sorted keys, so the output is
/// deterministic for any value.
///

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float64(v) => write_float(f, *v),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write_json_str(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Self::Null => f.write_str("null"),
            Self::Text(s) => write_json_str(f, s),
            Self::Uint(u) => write!(f, "{u}"),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() {
        write!(f, "{v}")
    } else if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_sign_negative() {
        f.write_str("-Infinity")
    } else {
        f.write_str("Infinity")
    }
}

pub(crate) fn write_json_str(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if u32::from(c) < 0x20 => write!(f, "\\u{:04x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

///
/// CONVERSIONS
///

macro_rules! impl_from_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Uint(u64::from(v))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    #[expect(clippy::cast_precision_loss)]
    fn from(v: usize) -> Self {
        u64::try_from(v).map_or(Self::Float64(v as f64), Self::Uint)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float64(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::from_list(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Self::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::List(vec![a.into(), b.into(), c.into()])
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}
