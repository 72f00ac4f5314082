use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by hashing and diagnostics.
///
/// IMPORTANT:
/// Tag values feed the stable key hash and must remain fixed.
/// Int and Uint share no tag space with Float64; integral floats are
/// canonicalized to an integer variant before hashing.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Bool = 1,
    Float64 = 2,
    Int = 3,
    List = 4,
    Map = 5,
    Null = 6,
    Text = 7,
    Uint = 8,
}

impl ValueTag {
    /// Stable hash byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Float64 => "Float64",
            Self::Int => "Int",
            Self::List => "List",
            Self::Map => "Map",
            Self::Null => "Null",
            Self::Text => "Text",
            Self::Uint => "Uint",
        }
    }
}

#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Bool(_) => ValueTag::Bool,
        Value::Float64(_) => ValueTag::Float64,
        Value::Int(_) => ValueTag::Int,
        Value::List(_) => ValueTag::List,
        Value::Map(_) => ValueTag::Map,
        Value::Null => ValueTag::Null,
        Value::Text(_) => ValueTag::Text,
        Value::Uint(_) => ValueTag::Uint,
    }
}
