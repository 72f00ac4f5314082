//! Module: materialize
//! Responsibility: render a finished accumulator tree as plain values.
//! Does not own: merge decisions; rendering never mutates the tree.
//! Boundary: called once per fold, after the last row.

use crate::{
    accumulator::{Accumulator, Body, ManyAccumulator, OneAccumulator, Slot},
    field::Transform,
    value::Value,
};
use std::collections::BTreeMap;

/// Render one accumulator; `None` when the position never received a value.
#[must_use]
pub(crate) fn to_value(acc: &Accumulator) -> Option<Value> {
    match acc {
        Accumulator::One(one) => one_to_value(one),
        Accumulator::Many(many) => Some(many_to_value(many)),
    }
}

fn one_to_value(one: &OneAccumulator) -> Option<Value> {
    let value = instance_value(one)?;

    Some(apply(one.transform(), value))
}

fn instance_value(one: &OneAccumulator) -> Option<Value> {
    match one.body() {
        Body::Absent => None,
        Body::Value(value) => Some(value.clone()),
        Body::Record(slots) => {
            let mut map = BTreeMap::new();
            for (name, slot) in slots {
                let value = match slot {
                    Slot::Value(value) => Some(value.clone()),
                    Slot::Relation(relation) => to_value(relation),
                };
                if let Some(value) = value {
                    map.insert(name.clone(), value);
                }
            }

            Some(Value::Map(map))
        }
    }
}

// Members are rendered without the collection transform, which then applies
// per member. Absent members keep their slot as `null`.
fn many_to_value(many: &ManyAccumulator) -> Value {
    Value::List(
        many.members()
            .iter()
            .map(|member| {
                one_to_value(member).map_or(Value::Null, |value| apply(many.transform(), value))
            })
            .collect(),
    )
}

fn apply(transform: Option<&Transform>, value: Value) -> Value {
    match transform {
        Some(transform) => transform(value),
        None => value,
    }
}

///
/// TESTS
///
