use derive_more::Display;
use rowfold_core::error::{AggregationConflictError, ConflictKind};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + tree path taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub path: Option<String>,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }
}

impl From<AggregationConflictError> for Error {
    fn from(err: AggregationConflictError) -> Self {
        Self::new(
            err.kind().into(),
            err.path().map(ToString::to_string),
            err.to_string(),
        )
    }
}

///
/// ErrorKind
/// Public conflict taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// One row asserted a single instance where another asserted a list.
    Arity,

    /// Two rows asserted different identities for one instance.
    Identity,

    /// A field was a relation in one row and a plain value in another.
    Type,

    /// Strict mode saw two different plain values for one field.
    Value,
}

impl From<ConflictKind> for ErrorKind {
    fn from(kind: ConflictKind) -> Self {
        match kind {
            ConflictKind::Arity => Self::Arity,
            ConflictKind::Identity => Self::Identity,
            ConflictKind::Type => Self::Type,
            ConflictKind::Value => Self::Value,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use rowfold_core::{
        aggregate::aggregate,
        field::{many, one_keyed},
        record,
    };

    #[test]
    fn conflicts_convert_with_kind_and_path() {
        let err = aggregate(
            |(id, pet): (u64, u64)| {
                many(
                    id,
                    record! { "pet" => one_keyed(pet, pet) },
                )
            },
            [(1, 10), (1, 11)],
        )
        .expect_err("identity conflict");

        let public = Error::from(err);
        assert_eq!(public.kind, ErrorKind::Identity);
        assert_eq!(public.path.as_deref(), Some("[1].pet"));
        assert!(public.message.starts_with("aggregation conflict at [1].pet"));
    }

    #[test]
    fn error_round_trips_through_json() {
        let err = Error::new(ErrorKind::Type, Some("friends".into()), "type conflict");
        let json = serde_json::to_string(&err).expect("error should serialize");
        let back: Error = serde_json::from_str(&json).expect("error should deserialize");

        assert_eq!(back, err);
        assert_eq!(back.kind.to_string(), "Type");
    }
}
