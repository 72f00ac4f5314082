//! Core engine for rowfold: the value model, shape descriptors, the
//! accumulator merge engine, and the `aggregate` entrypoints that fold flat
//! rows into nested, identity-deduplicated values.
#![warn(unreachable_pub)]

mod macros;

// public exports are one module level down
pub mod aggregate;
pub mod config;
pub mod error;
pub mod field;
pub mod key;
pub mod obs;
pub mod value;

mod accumulator;
mod materialize;

///
/// Prelude
///
/// Prelude contains the descriptor vocabulary and entrypoints.
/// No sinks, stringifier internals, or metrics types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        aggregate::{Aggregator, aggregate, aggregate_or, aggregate_value},
        config::{AggregateConfig, ScalarPolicy},
        error::AggregationConflictError,
        field::{Field, Record, many, one, one_keyed},
        record,
        value::Value,
    };
}
