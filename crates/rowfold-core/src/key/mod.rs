//! Module: key
//! Responsibility: identity-key projection to lookup strings and bucketed
//! identity lookup.
//! Does not own: structural equality (see `value`) or merge policy.
//! Boundary: consumed by collection accumulators during merge.

mod index;


pub(crate) use index::IdentityIndex;

use crate::value::{Value, hash_value};
use std::fmt;

///
/// KeyStringifier
///
/// Projects one identity key to the string used as its lookup bucket.
///
/// Contract: identity-equal keys must produce the same string. Different keys
/// may share a string; bucket members are still separated by equality.
///

pub trait KeyStringifier {
    fn stringify(&self, key: &Value) -> String;
}

impl<F> KeyStringifier for F
where
    F: Fn(&Value) -> String,
{
    fn stringify(&self, key: &Value) -> String {
        self(key)
    }
}

impl fmt::Debug for dyn KeyStringifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyStringifier(..)")
    }
}

///
/// CanonicalKeyStringifier
///
/// Text keys project to themselves, other scalars to their literal form and
/// composite keys to canonical JSON (sorted object keys, integral numbers
/// folded to integers).
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalKeyStringifier;

impl KeyStringifier for CanonicalKeyStringifier {
    fn stringify(&self, key: &Value) -> String {
        match key.canonicalize() {
            Value::Text(s) => s,
            other => other.to_string(),
        }
    }
}

///
/// StableHashStringifier
///
/// Projects keys to the hex form of their stable 128-bit XXH3 digest.
/// Keeps bucket strings fixed-width regardless of key size.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StableHashStringifier;

impl KeyStringifier for StableHashStringifier {
    fn stringify(&self, key: &Value) -> String {
        format!("{:032x}", u128::from_be_bytes(hash_value(key)))
    }
}
