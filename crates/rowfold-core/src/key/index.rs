use crate::value::Value;
use std::collections::BTreeMap;

///
/// IdentityIndex
///
/// IdentityIndex maps identity keys to member positions by stringified
/// bucket while keeping structural equality checks inside each bucket, so a
/// stringifier collision never merges two distinct identities.
///

#[derive(Debug, Default)]
pub(crate) struct IdentityIndex {
    buckets: BTreeMap<String, Vec<(Value, usize)>>,
    len: usize,
}

impl IdentityIndex {
    /// Return the position registered for an identity equal to `key`.
    #[must_use]
    pub(crate) fn position(&self, bucket: &str, key: &Value) -> Option<usize> {
        self.buckets.get(bucket).and_then(|members| {
            members
                .iter()
                .find(|(existing, _)| Value::identity_eq(existing, key))
                .map(|(_, position)| *position)
        })
    }

    /// Register one identity under its bucket.
    ///
    /// Callers check `position` first; registering an identity twice leaves the
    /// first registration authoritative.
    pub(crate) fn insert(&mut self, bucket: String, key: Value, position: usize) {
        self.buckets.entry(bucket).or_default().push((key, position));
        self.len += 1;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
