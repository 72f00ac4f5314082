use crate::{
    accumulator::{Accumulator, MergeContext, conflict},
    error::AggregationConflictError,
    field::{Entry, Payload, Record, Transform},
    value::Value,
};

const PLAIN: &str = "plain value";
const RELATION: &str = "relation";

///
/// Body
///
/// Stored instance value. Records keep first-seen field order.
///

pub(crate) enum Body {
    Absent,
    Value(Value),
    Record(Vec<(String, Slot)>),
}

impl Body {
    fn from_payload(payload: Payload, cx: MergeContext<'_>) -> Self {
        match payload {
            Payload::Absent => Self::Absent,
            Payload::Value(value) => Self::Value(value),
            Payload::Record(record) => Self::Record(
                record
                    .into_iter()
                    .map(|(name, entry)| (name, Slot::from_entry(entry, cx)))
                    .collect(),
            ),
        }
    }
}

///
/// Slot
///
/// One stored record field: a plain value or a promoted relation.
///

pub(crate) enum Slot {
    Value(Value),
    Relation(Accumulator),
}

impl Slot {
    fn from_entry(entry: Entry, cx: MergeContext<'_>) -> Self {
        match entry {
            Entry::Value(value) => Self::Value(value),
            Entry::Relation(field) => Self::Relation(Accumulator::from_field(field, cx)),
        }
    }
}

///
/// OneAccumulator
///
/// Accumulated state for one entity instance at one tree position.
///

pub(crate) struct OneAccumulator {
    identity: Option<Value>,
    body: Body,
    transform: Option<Transform>,
}

impl OneAccumulator {
    pub(crate) fn new(
        identity: Option<Value>,
        payload: Payload,
        transform: Option<Transform>,
        cx: MergeContext<'_>,
    ) -> Self {
        Self {
            identity,
            body: Body::from_payload(payload, cx),
            transform,
        }
    }

    #[must_use]
    pub(crate) const fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub(crate) const fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub(crate) fn merge(
        &mut self,
        identity: Option<Value>,
        payload: Payload,
        transform: Option<Transform>,
        cx: MergeContext<'_>,
    ) -> Result<(), AggregationConflictError> {
        // An implicit identity adopts the first explicit one; an incoming
        // implicit identity asserts nothing.
        if let Some(incoming) = identity {
            match &self.identity {
                Some(existing) if !Value::identity_eq(existing, &incoming) => {
                    return Err(conflict(AggregationConflictError::identity(
                        existing, &incoming,
                    )));
                }
                Some(_) => {}
                None => self.identity = Some(incoming),
            }
        }

        if self.transform.is_none() {
            self.transform = transform;
        }

        self.merge_body(payload, cx)
    }

    fn merge_body(
        &mut self,
        payload: Payload,
        cx: MergeContext<'_>,
    ) -> Result<(), AggregationConflictError> {
        if matches!(self.body, Body::Absent) {
            self.body = Body::from_payload(payload, cx);
            return Ok(());
        }

        match (&mut self.body, payload) {
            (Body::Record(slots), Payload::Record(record)) => merge_record(slots, record, cx),
            (Body::Value(existing), Payload::Value(incoming)) => {
                if cx.scalar_policy.is_strict() && !Value::identity_eq(existing, &incoming) {
                    return Err(conflict(AggregationConflictError::value_mismatch(
                        None, existing, &incoming,
                    )));
                }
                Ok(())
            }

            // Relations never attach to scalar instances, and a record never
            // replaces an established scalar or null.
            (_, Payload::Absent)
            | (Body::Absent, _)
            | (Body::Record(_), Payload::Value(_))
            | (Body::Value(_), Payload::Record(_)) => Ok(()),
        }
    }
}

fn merge_record(
    slots: &mut Vec<(String, Slot)>,
    record: Record,
    cx: MergeContext<'_>,
) -> Result<(), AggregationConflictError> {
    for (name, entry) in record {
        let Some(position) = slots.iter().position(|(existing, _)| *existing == name) else {
            slots.push((name, Slot::from_entry(entry, cx)));
            continue;
        };

        let slot = &mut slots[position].1;
        match entry {
            Entry::Relation(field) => match slot {
                Slot::Relation(existing) => {
                    existing
                        .merge(field, cx)
                        .map_err(|err| err.with_field(&name))?;
                }
                Slot::Value(Value::Null) => {
                    *slot = Slot::Relation(Accumulator::from_field(field, cx));
                }
                Slot::Value(_) => {
                    return Err(conflict(AggregationConflictError::type_mismatch(
                        name, PLAIN, RELATION,
                    )));
                }
            },
            Entry::Value(incoming) => match slot {
                Slot::Relation(_) if incoming.is_null() => {}
                Slot::Relation(_) => {
                    return Err(conflict(AggregationConflictError::type_mismatch(
                        name, RELATION, PLAIN,
                    )));
                }
                Slot::Value(existing) => {
                    if cx.scalar_policy.is_strict() && !Value::identity_eq(existing, &incoming) {
                        return Err(conflict(AggregationConflictError::value_mismatch(
                            Some(&name),
                            existing,
                            &incoming,
                        )));
                    }
                }
            },
        }
    }

    Ok(())
}
