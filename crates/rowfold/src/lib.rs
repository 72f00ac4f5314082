//! ## Crate layout
//! - `core`: value model, descriptors, merge engine, configuration and
//!   observability.
//! - `error`: serializable public error type for callers that report
//!   conflicts across a boundary.
//!
//! The `prelude` module carries the descriptor vocabulary and the
//! `aggregate` entrypoints.

pub use rowfold_core as core;

pub mod error;

/// re-exports
///
/// stops the user having to add serde and serde_json to their Cargo.toml to
/// build rows or deserialize configuration
pub mod __reexports {
    pub use serde;
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use rowfold_core::record;

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        aggregate::{Aggregator, Fold, aggregate, aggregate_or, aggregate_value},
        config::{AggregateConfig, KeyEncoding, ScalarPolicy},
        error::{AggregationConflictError, ConflictKind},
        field::{Field, Record, many, one, one_keyed},
        value::Value,
    };
    pub use crate::record;
    pub use serde::{Deserialize, Serialize};
}
