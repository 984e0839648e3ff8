use thiserror::Error;

use crate::RawValue;

/// Broad classification of a [`BitsetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
    InvalidState,
}

#[derive(Debug, Error)]
pub enum BitsetError {
    #[error("invalid allocation size: {len} initial values for {size} slots")]
    InvalidAllocationSize { len: usize, size: usize },
    #[error("sentinel values must not be empty")]
    EmptySentinel,
    #[error("true and false sentinels are both {0}")]
    IndistinctSentinels(RawValue),
    #[error("operand sizes differ: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("invalid binary string: {0}")]
    Parse(String),
    #[error("offset out of range: {offset} for size {size}")]
    OutOfRange { offset: usize, size: usize },
    #[error("cannot resolve {0} to either sentinel")]
    Unresolvable(RawValue),
}

impl BitsetError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAllocationSize { .. }
            | Self::EmptySentinel
            | Self::IndistinctSentinels(_)
            | Self::LengthMismatch { .. }
            | Self::Parse(_) => ErrorKind::InvalidArgument,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Unresolvable(_) => ErrorKind::InvalidState,
        }
    }
}
