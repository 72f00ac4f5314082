use crate::value::Value;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Arity
///
/// Whether a tree position holds one instance or a keyed list of instances.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    One,
    Many,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Many => f.write_str("many"),
        }
    }
}

///
/// ConflictKind
///
/// Stable discriminator for aggregation conflicts.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConflictKind {
    Arity,
    Identity,
    Type,
    Value,
}

impl ConflictKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arity => "arity",
            Self::Identity => "identity",
            Self::Type => "type",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// AggregationConflictError
///
/// Merge-time contradiction that aborts the whole fold.
/// Conflicts raised below the root are wrapped in `Context` naming the tree
/// position, e.g. `friends[2].pets`.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum AggregationConflictError {
    #[error("arity conflict: expected {expected}, got {found}")]
    Arity { expected: Arity, found: Arity },

    #[error("identity conflict: found multiple results with differing ids: {existing} and {incoming}")]
    Identity { existing: Value, incoming: Value },

    #[error("type conflict on field '{field}': holds a {existing}, got a {incoming}")]
    Type {
        field: String,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("value conflict{}: {existing} and {incoming}", field_suffix(.field.as_deref()))]
    Value {
        field: Option<String>,
        existing: Value,
        incoming: Value,
    },

    #[error("aggregation conflict at {path}: {source}")]
    Context {
        path: String,
        #[source]
        source: Box<Self>,
    },
}

fn field_suffix(field: Option<&str>) -> String {
    field.map_or_else(String::new, |field| format!(" on field '{field}'"))
}

impl AggregationConflictError {
    /// Return the discriminator of the innermost conflict.
    #[must_use]
    pub fn kind(&self) -> ConflictKind {
        match self {
            Self::Arity { .. } => ConflictKind::Arity,
            Self::Identity { .. } => ConflictKind::Identity,
            Self::Type { .. } => ConflictKind::Type,
            Self::Value { .. } => ConflictKind::Value,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Prepend a record field segment to the conflict path.
    #[must_use]
    pub fn with_field(self, field: impl AsRef<str>) -> Self {
        self.with_path_segment(field.as_ref())
    }

    /// Prepend a collection member segment to the conflict path.
    #[must_use]
    pub fn with_member(self, key: impl AsRef<str>) -> Self {
        self.with_path_segment(format!("[{}]", key.as_ref()))
    }

    /// Return the full contextual path, if available.
    #[must_use]
    pub const fn path(&self) -> Option<&str> {
        match self {
            Self::Context { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Return the innermost, non-context conflict variant.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.leaf(),
            _ => self,
        }
    }

    pub(crate) const fn arity(expected: Arity, found: Arity) -> Self {
        Self::Arity { expected, found }
    }

    pub(crate) fn identity(existing: &Value, incoming: &Value) -> Self {
        Self::Identity {
            existing: existing.clone(),
            incoming: incoming.clone(),
        }
    }

    pub(crate) fn type_mismatch(
        field: impl Into<String>,
        existing: &'static str,
        incoming: &'static str,
    ) -> Self {
        Self::Type {
            field: field.into(),
            existing,
            incoming,
        }
    }

    pub(crate) fn value_mismatch(field: Option<&str>, existing: &Value, incoming: &Value) -> Self {
        Self::Value {
            field: field.map(ToString::to_string),
            existing: existing.clone(),
            incoming: incoming.clone(),
        }
    }

    #[must_use]
    fn with_path_segment(self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        match self {
            Self::Context { path, source } => Self::Context {
                path: Self::join_segments(segment.as_str(), path.as_str()),
                source,
            },
            source => Self::Context {
                path: segment,
                source: Box::new(source),
            },
        }
    }

    #[must_use]
    fn join_segments(prefix: &str, suffix: &str) -> String {
        if suffix.starts_with('[') {
            format!("{prefix}{suffix}")
        } else {
            format!("{prefix}.{suffix}")
        }
    }
}

///
/// TESTS
///
