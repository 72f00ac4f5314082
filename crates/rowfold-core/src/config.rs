use crate::key::{CanonicalKeyStringifier, KeyStringifier, StableHashStringifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// ScalarPolicy
///
/// How a later row's plain value is reconciled with an already-populated
/// plain value at the same position.
///
/// FirstWins → the first observed value is kept, later values are ignored.
/// Strict    → a later value that differs raises a value conflict.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarPolicy {
    #[default]
    FirstWins,
    Strict,
}

impl ScalarPolicy {
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

///
/// KeyEncoding
///
/// Built-in projection of identity keys to bucket strings.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    #[default]
    Canonical,
    StableHash,
}

impl KeyEncoding {
    /// Build the stringifier this encoding selects.
    #[must_use]
    pub fn stringifier(self) -> Arc<dyn KeyStringifier> {
        match self {
            Self::Canonical => Arc::new(CanonicalKeyStringifier),
            Self::StableHash => Arc::new(StableHashStringifier),
        }
    }
}

///
/// AggregateConfig
///
/// Fold-wide policy selected once per `Aggregator`.
/// Every field has a default so partial documents deserialize.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub scalar_policy: ScalarPolicy,
    pub key_encoding: KeyEncoding,
    pub debug: bool,
}

impl AggregateConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scalar_policy: ScalarPolicy::FirstWins,
            key_encoding: KeyEncoding::Canonical,
            debug: false,
        }
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self::new().with_scalar_policy(ScalarPolicy::Strict)
    }

    #[must_use]
    pub const fn with_scalar_policy(mut self, scalar_policy: ScalarPolicy) -> Self {
        self.scalar_policy = scalar_policy;
        self
    }

    #[must_use]
    pub const fn with_key_encoding(mut self, key_encoding: KeyEncoding) -> Self {
        self.key_encoding = key_encoding;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn default_config_is_lenient_and_canonical() {
        let config = AggregateConfig::default();
        assert_eq!(config, AggregateConfig::new());
        assert!(!config.scalar_policy.is_strict());
        assert_eq!(config.key_encoding, KeyEncoding::Canonical);
        assert!(!config.debug);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: AggregateConfig =
            serde_json::from_str(r#"{"scalar_policy":"strict"}"#).expect("config should parse");
        assert_eq!(config, AggregateConfig::strict());

        let config: AggregateConfig =
            serde_json::from_str(r#"{"key_encoding":"stable_hash","debug":true}"#)
                .expect("config should parse");
        assert_eq!(config.scalar_policy, ScalarPolicy::FirstWins);
        assert_eq!(config.key_encoding, KeyEncoding::StableHash);
        assert!(config.debug);
    }

    #[test]
    fn key_encoding_selects_stringifier() {
        let key = Value::from("abc");
        assert_eq!(KeyEncoding::Canonical.stringifier().stringify(&key), "abc");
        assert_eq!(
            KeyEncoding::StableHash.stringifier().stringify(&key).len(),
            32
        );
    }
}
