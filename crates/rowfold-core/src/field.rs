//! Module: field
//! Responsibility: caller-facing shape descriptors built fresh for every row.
//! Does not own: merge semantics (see `accumulator`) or output rendering.
//! Boundary: `one`, `one_keyed`, `many` and `Record` are the only ways rows
//! describe their place in the output tree.

use crate::{error::Arity, value::Value};
use derive_more::{Deref, IntoIterator};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Transform
///
/// Output transform applied to each materialized instance value.
///

pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

///
/// Shape
///
/// Arity of a descriptor plus the identity it asserts.
///
/// One  → one instance; identity is optional and checked only when present.
/// Many → one member of a keyed list; the key is the member identity.
///

#[derive(Clone, Debug)]
pub enum Shape {
    One { identity: Option<Value> },
    Many { key: Value },
}

impl Shape {
    #[must_use]
    pub const fn arity(&self) -> Arity {
        match self {
            Self::One { .. } => Arity::One,
            Self::Many { .. } => Arity::Many,
        }
    }
}

///
/// Field
///
/// Declarative descriptor for one row's contribution at one tree position.
///

#[derive(Clone)]
pub struct Field {
    shape: Shape,
    payload: Payload,
    transform: Option<Transform>,
}

impl Field {
    fn new(shape: Shape, payload: Payload) -> Self {
        Self {
            shape,
            payload: payload.normalize(),
            transform: None,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.shape.arity()
    }

    /// Identity asserted by this descriptor: the key for `Many`, the explicit
    /// identity (if any) for `One`.
    #[must_use]
    pub const fn identity(&self) -> Option<&Value> {
        match &self.shape {
            Shape::One { identity } => identity.as_ref(),
            Shape::Many { key } => Some(key),
        }
    }

    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub const fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Attach one nested descriptor under `name`.
    ///
    /// Relations attach to record payloads only; on absent or scalar payloads
    /// they are discarded, matching how such instances ignore relations
    /// during merge.
    #[must_use]
    pub fn with_relation(mut self, name: impl Into<String>, field: Self) -> Self {
        self.payload = self.payload.with_entry(name.into(), Entry::Relation(field));
        self
    }

    /// Attach several nested descriptors; later names replace earlier ones.
    #[must_use]
    pub fn with_relations<N>(self, relations: impl IntoIterator<Item = (N, Self)>) -> Self
    where
        N: Into<String>,
    {
        relations
            .into_iter()
            .fold(self, |field, (name, relation)| field.with_relation(name, relation))
    }

    /// Compose an output transform after any transform already attached.
    #[must_use]
    pub fn map<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let transform: Transform = match self.transform.take() {
            Some(prev) => Arc::new(move |value: Value| f(prev(value))),
            None => Arc::new(f),
        };
        self.transform = Some(transform);
        self
    }

    pub(crate) fn into_parts(self) -> (Shape, Payload, Option<Transform>) {
        (self.shape, self.payload, self.transform)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("shape", &self.shape)
            .field("payload", &self.payload)
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Singular descriptor with implicit identity.
#[must_use]
pub fn one(value: impl Into<Payload>) -> Field {
    Field::new(Shape::One { identity: None }, value.into())
}

/// Singular descriptor with an explicit identity.
#[must_use]
pub fn one_keyed(key: impl Into<Value>, value: impl Into<Payload>) -> Field {
    Field::new(
        Shape::One {
            identity: Some(key.into()),
        },
        value.into(),
    )
}

/// Collection member descriptor identified by `key`.
#[must_use]
pub fn many(key: impl Into<Value>, value: impl Into<Payload>) -> Field {
    Field::new(Shape::Many { key: key.into() }, value.into())
}

///
/// Payload
///
/// Instance body asserted by one descriptor.
///

#[derive(Clone, Debug, Default)]
pub enum Payload {
    #[default]
    Absent,
    Value(Value),
    Record(Record),
}

impl Payload {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    // A plain map is a record whose entries are all plain values.
    fn normalize(self) -> Self {
        match self {
            Self::Value(Value::Map(entries)) => Self::Record(Record::from(entries)),
            other => other,
        }
    }

    fn with_entry(self, name: String, entry: Entry) -> Self {
        match self.normalize() {
            Self::Record(record) => Self::Record(record.entry(name, entry)),
            other => other,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value).normalize()
    }
}

impl From<&Value> for Payload {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<Option<Value>> for Payload {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::from(Value::from(value))
    }
}

///
/// Entry
///
/// One named record entry: a plain value or a nested descriptor.
///

#[derive(Clone, Debug)]
pub enum Entry {
    Value(Value),
    Relation(Field),
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Value> for Entry {
    fn from(value: &Value) -> Self {
        Self::Value(value.clone())
    }
}

impl From<Field> for Entry {
    fn from(field: Field) -> Self {
        Self::Relation(field)
    }
}

/// A missing optional relation is recorded as a plain `null`, which a later
/// relation at the same name replaces.
impl From<Option<Field>> for Entry {
    fn from(field: Option<Field>) -> Self {
        field.map_or(Self::Value(Value::Null), Self::Relation)
    }
}

macro_rules! impl_plain_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Entry {
                fn from(v: $t) -> Self {
                    Self::Value(Value::from(v))
                }
            }

            impl From<$t> for Payload {
                fn from(v: $t) -> Self {
                    Self::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_plain_from!(
    i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &String,
);

///
/// Record
///
/// Ordered name → entry dictionary used as an instance body.
/// Names are unique; re-adding a name replaces its entry in place.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct Record(Vec<(String, Entry)>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Add or replace one entry in place.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) {
        let name = name.into();
        let entry = entry.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = entry,
            None => self.0.push((name, entry)),
        }
    }

    /// Look up one entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, value)| (name, Entry::Value(value)))
                .collect(),
        )
    }
}

impl<N, E> FromIterator<(N, E)> for Record
where
    N: Into<String>,
    E: Into<Entry>,
{
    fn from_iter<I: IntoIterator<Item = (N, E)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |record, (name, entry)| record.entry(name, entry))
    }
}

///
/// TESTS
///
