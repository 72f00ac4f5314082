//! Module: accumulator
//! Responsibility: persistent merge-time tree that folds descriptors by
//! identity and detects structural conflicts.
//! Does not own: descriptor construction, key projection policy, or output
//! rendering (see `materialize`).
//! Boundary: the orchestrator owns one root accumulator per fold.

mod many;
mod one;


pub(crate) use many::ManyAccumulator;
pub(crate) use one::{Body, OneAccumulator, Slot};

use crate::{
    config::ScalarPolicy,
    error::{AggregationConflictError, Arity},
    field::{Field, Shape},
    key::KeyStringifier,
    obs::sink::{MetricsEvent, record},
};

///
/// MergeContext
///
/// Fold-wide policy threaded through every recursive merge.
///

#[derive(Clone, Copy)]
pub(crate) struct MergeContext<'a> {
    pub(crate) stringifier: &'a dyn KeyStringifier,
    pub(crate) scalar_policy: ScalarPolicy,
}

impl<'a> MergeContext<'a> {
    #[must_use]
    pub(crate) const fn new(stringifier: &'a dyn KeyStringifier, scalar_policy: ScalarPolicy) -> Self {
        Self {
            stringifier,
            scalar_policy,
        }
    }
}

///
/// Accumulator
///
/// Merge-time counterpart of a descriptor. Arity is fixed by the first
/// descriptor observed at a position.
///

pub(crate) enum Accumulator {
    One(OneAccumulator),
    Many(ManyAccumulator),
}

impl Accumulator {
    /// Promote one descriptor, including all nested relations.
    #[must_use]
    pub(crate) fn from_field(field: Field, cx: MergeContext<'_>) -> Self {
        let (shape, payload, transform) = field.into_parts();
        match shape {
            Shape::One { identity } => {
                Self::One(OneAccumulator::new(identity, payload, transform, cx))
            }
            Shape::Many { key } => Self::Many(ManyAccumulator::new(key, payload, transform, cx)),
        }
    }

    #[must_use]
    pub(crate) const fn arity(&self) -> Arity {
        match self {
            Self::One(_) => Arity::One,
            Self::Many(_) => Arity::Many,
        }
    }

    /// Merge one descriptor into this position.
    pub(crate) fn merge(
        &mut self,
        field: Field,
        cx: MergeContext<'_>,
    ) -> Result<(), AggregationConflictError> {
        let (shape, payload, transform) = field.into_parts();
        match (self, shape) {
            (Self::One(one), Shape::One { identity }) => {
                one.merge(identity, payload, transform, cx)
            }
            (Self::Many(many), Shape::Many { key }) => many.merge(key, payload, transform, cx),
            (existing, shape) => Err(conflict(AggregationConflictError::arity(
                existing.arity(),
                shape.arity(),
            ))),
        }
    }
}

// Leaf conflicts are counted once, where they are raised.
pub(crate) fn conflict(err: AggregationConflictError) -> AggregationConflictError {
    record(MetricsEvent::Conflict { kind: err.kind() });
    err
}
