use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw input value that a [`Bitset`](crate::Bitset) resolves to `true` or
/// `false` by comparing it against its sentinel pair.
///
/// Comparison is strict: `Int(1)` and `Text("1")` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawValue {
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<char> for RawValue {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The pair of raw values standing for `true` and `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Sentinels {
    pub(crate) truthy: RawValue,
    pub(crate) falsy: RawValue,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            truthy: RawValue::Int(1),
            falsy: RawValue::Int(0),
        }
    }
}

impl Sentinels {
    pub(crate) fn new(truthy: RawValue, falsy: RawValue) -> Result<Self, crate::BitsetError> {
        if falsy.is_empty() || truthy.is_empty() {
            return Err(crate::BitsetError::EmptySentinel);
        }
        if truthy == falsy {
            return Err(crate::BitsetError::IndistinctSentinels(truthy));
        }
        Ok(Self { truthy, falsy })
    }

    /// The sentinels installed by the textual form.
    pub(crate) fn binary_digits() -> Self {
        Self {
            truthy: RawValue::from('1'),
            falsy: RawValue::from('0'),
        }
    }

    pub(crate) fn resolve(&self, value: &RawValue) -> Result<bool, crate::BitsetError> {
        if *value == self.truthy {
            Ok(true)
        } else if *value == self.falsy {
            Ok(false)
        } else {
            Err(crate::BitsetError::Unresolvable(value.clone()))
        }
    }
}
