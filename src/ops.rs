//! Element-wise set algebra over two bitsets.
//!
//! These return a fresh bitset carrying the left operand's sentinel pair and
//! leave both operands untouched. For in-place updates use
//! [`Bitset::and_assign`] and friends.

use crate::{Bitset, BitsetError};

/// # Errors
///
/// Returns `InvalidArgument` if `x` and `y` differ in size.
pub fn and(x: &Bitset, y: &Bitset) -> Result<Bitset, BitsetError> {
    let mut result = x.clone();
    result.and_assign(y)?;
    Ok(result)
}

/// # Errors
///
/// Returns `InvalidArgument` if `x` and `y` differ in size.
pub fn or(x: &Bitset, y: &Bitset) -> Result<Bitset, BitsetError> {
    let mut result = x.clone();
    result.or_assign(y)?;
    Ok(result)
}

/// # Errors
///
/// Returns `InvalidArgument` if `x` and `y` differ in size.
pub fn xor(x: &Bitset, y: &Bitset) -> Result<Bitset, BitsetError> {
    let mut result = x.clone();
    result.xor_assign(y)?;
    Ok(result)
}

#[must_use]
pub fn not(x: &Bitset) -> Bitset {
    let mut result = x.clone();
    result.negate();
    result
}
