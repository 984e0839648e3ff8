use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use crate::BitsetError;
use crate::raw_value::{RawValue, Sentinels};

/// Largest number of slots a [`Bitset`] holds: one 64-bit word minus a
/// reserved margin of three bits.
pub const MAX_CAPACITY: usize = u64::BITS as usize - 3;

/// Selects the predicate evaluated by [`Bitset::test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    All,
    Any,
    None,
}

/// A fixed-capacity sequence of boolean slots packed into one machine word.
///
/// Slot `i` lives at bit `i` of the word. Bits at or above [`Bitset::size`]
/// are always zero.
///
/// Raw input values (initializers and [`Bitset::set`]) are resolved through a
/// sentinel pair, `1`/`0` unless overridden, so a bitset can be built straight
/// from data such as `['A', 'B', 'A']`. Equality and hashing only look at the
/// slot values, never at the sentinels.
#[derive(Debug, Clone)]
pub struct Bitset {
    bits: u64,
    len: usize,
    sentinels: Sentinels,
}

fn clamp_size(size: i64) -> usize {
    usize::try_from(size)
        .ok()
        .filter(|&size| size <= MAX_CAPACITY)
        .unwrap_or(0)
}

impl Bitset {
    /// Creates a bitset of `size` false slots.
    ///
    /// A `size` outside `1..=MAX_CAPACITY` is not an error: the result simply
    /// has no slots, which callers detect with `size() == 0`.
    #[must_use]
    pub fn new(size: i64) -> Self {
        Self {
            bits: 0,
            len: clamp_size(size),
            sentinels: Sentinels::default(),
        }
    }

    /// Like [`Bitset::new`] but resolving raw values through a custom
    /// sentinel pair.
    ///
    /// # Errors
    ///
    /// Fails if either sentinel is empty text or both are equal, unless
    /// `size` is clamped to zero.
    pub fn with_sentinels(
        size: i64,
        true_value: impl Into<RawValue>,
        false_value: impl Into<RawValue>,
    ) -> Result<Self, BitsetError> {
        Self::with_initializer(size, std::iter::empty::<RawValue>(), true_value, false_value)
    }

    /// Creates a bitset whose leading slots come from `initializer`, using
    /// the default `1`/`0` sentinels.
    ///
    /// # Errors
    ///
    /// See [`Bitset::with_initializer`].
    pub fn from_values<I>(size: i64, initializer: I) -> Result<Self, BitsetError>
    where
        I: IntoIterator,
        I::Item: Into<RawValue>,
    {
        Self::build(size, initializer, Sentinels::default())
    }

    /// Creates a bitset of `size` slots. Slot `i` is `initializer[i]`
    /// resolved against the sentinel pair, or false past the end of the
    /// initializer.
    ///
    /// When `size` is clamped to zero the result is an empty bitset with the
    /// default sentinels: neither the initializer nor the sentinel pair is
    /// checked.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a sentinel is empty, the sentinels are equal,
    ///   or the initializer is longer than `size`.
    /// - `InvalidState` if an initial value matches neither sentinel.
    pub fn with_initializer<I>(
        size: i64,
        initializer: I,
        true_value: impl Into<RawValue>,
        false_value: impl Into<RawValue>,
    ) -> Result<Self, BitsetError>
    where
        I: IntoIterator,
        I::Item: Into<RawValue>,
    {
        if clamp_size(size) == 0 {
            return Ok(Self::new(size));
        }
        let sentinels = Sentinels::new(true_value.into(), false_value.into())?;
        Self::build(size, initializer, sentinels)
    }

    fn build<I>(size: i64, initializer: I, sentinels: Sentinels) -> Result<Self, BitsetError>
    where
        I: IntoIterator,
        I::Item: Into<RawValue>,
    {
        let mut bitset = Self {
            bits: 0,
            len: clamp_size(size),
            sentinels,
        };
        if bitset.len == 0 {
            return Ok(bitset);
        }
        let values: Vec<RawValue> = initializer.into_iter().map(Into::into).collect();
        if values.len() > bitset.len {
            return Err(BitsetError::InvalidAllocationSize {
                len: values.len(),
                size: bitset.len,
            });
        }
        for (offset, value) in values.iter().enumerate() {
            if bitset.sentinels.resolve(value)? {
                bitset.bits |= 1 << offset;
            }
        }
        Ok(bitset)
    }

    /// Builds a bitset from already-resolved slot values. The caller
    /// guarantees `values.len() <= MAX_CAPACITY`.
    pub(crate) fn from_slots(values: &[bool], sentinels: Sentinels) -> Self {
        debug_assert!(values.len() <= MAX_CAPACITY);
        let bits = values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value)
            .fold(0u64, |acc, (offset, _)| acc | (1 << offset));
        Self {
            bits,
            len: values.len(),
            sentinels,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn true_value(&self) -> &RawValue {
        &self.sentinels.truthy
    }

    #[must_use]
    pub fn false_value(&self) -> &RawValue {
        &self.sentinels.falsy
    }

    fn bit(&self, offset: usize) -> bool {
        (self.bits & (1 << offset)) != 0
    }

    fn mask(&self) -> u64 {
        (1 << self.len) - 1
    }

    fn check_bounds(&self, offset: usize) -> Result<(), BitsetError> {
        if !self.exists(offset) {
            return Err(BitsetError::OutOfRange {
                offset,
                size: self.len,
            });
        }
        Ok(())
    }

    fn check_same_size(&self, other: &Self) -> Result<(), BitsetError> {
        if self.len != other.len {
            return Err(BitsetError::LengthMismatch {
                left: self.len,
                right: other.len,
            });
        }
        Ok(())
    }

    /// Whether `offset` names an existing slot.
    #[must_use]
    pub fn exists(&self, offset: usize) -> bool {
        offset < self.len
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if the slot does not exist.
    pub fn get(&self, offset: usize) -> Result<bool, BitsetError> {
        self.check_bounds(offset)?;
        Ok(self.bit(offset))
    }

    /// Resolves `value` against the sentinel pair and stores it at `offset`.
    ///
    /// # Errors
    ///
    /// See [`Bitset::set_bit`]. Additionally `InvalidState` if `value`
    /// matches neither sentinel.
    pub fn set(&mut self, offset: usize, value: impl Into<RawValue>) -> Result<(), BitsetError> {
        self.check_writable(offset)?;
        let value = self.sentinels.resolve(&value.into())?;
        self.set_bit(offset, value)
    }

    /// Stores `value` at `offset`. Writing at exactly `size()` appends a slot.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `offset > size()`, or when appending would
    /// exceed [`MAX_CAPACITY`].
    pub fn set_bit(&mut self, offset: usize, value: bool) -> Result<(), BitsetError> {
        self.check_writable(offset)?;
        if offset == self.len {
            self.len += 1;
        }
        let mask = 1 << offset;
        if value {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
        Ok(())
    }

    fn check_writable(&self, offset: usize) -> Result<(), BitsetError> {
        if offset > self.len || offset >= MAX_CAPACITY {
            return Err(BitsetError::OutOfRange {
                offset,
                size: self.len,
            });
        }
        Ok(())
    }

    /// Removes the slot at `offset`, shifting every later slot down by one
    /// and shrinking the bitset. This does not clear the slot to false.
    ///
    /// Returns the removed value, or `None` if the slot did not exist.
    pub fn unset(&mut self, offset: usize) -> Option<bool> {
        if !self.exists(offset) {
            return None;
        }
        let removed = self.bit(offset);
        let below = self.bits & ((1 << offset) - 1);
        let above = (self.bits >> (offset + 1)) << offset;
        self.bits = below | above;
        self.len -= 1;
        Some(removed)
    }

    /// Evaluates `mode` over the slots `0..end`, walking from the highest
    /// index down.
    fn scan(&self, end: usize, mode: TestMode) -> bool {
        let mut slots = (0..end).rev().map(|offset| self.bit(offset));
        match mode {
            TestMode::All => slots.all(|value| value),
            TestMode::Any => slots.any(|value| value),
            TestMode::None => !slots.any(|value| value),
        }
    }

    /// True if every slot is set. Vacuously true when empty.
    #[must_use]
    pub fn all(&self) -> bool {
        self.scan(self.len, TestMode::All)
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.scan(self.len, TestMode::Any)
    }

    /// True if no slot is set. Vacuously true when empty.
    #[must_use]
    pub fn none(&self) -> bool {
        self.scan(self.len, TestMode::None)
    }

    /// With a mode, evaluates that predicate over the slots `0..=offset`.
    /// Without one, returns the slot at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the slot does not exist.
    pub fn test(&self, offset: usize, mode: Option<TestMode>) -> Result<bool, BitsetError> {
        self.check_bounds(offset)?;
        Ok(match mode {
            Some(mode) => self.scan(offset + 1, mode),
            None => self.bit(offset),
        })
    }

    /// Number of set slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().filter(|&value| value).count()
    }

    /// The slots read as a big-endian binary number: slot 0 is the most
    /// significant bit.
    #[must_use]
    pub fn to_int(&self) -> u64 {
        self.iter()
            .fold(0u64, |acc, value| (acc << 1) | u64::from(value))
    }

    /// Slot values in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|offset| self.bit(offset))
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sizes differ.
    pub fn and_assign(&mut self, other: &Self) -> Result<(), BitsetError> {
        self.check_same_size(other)?;
        self.bits &= other.bits;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sizes differ.
    pub fn or_assign(&mut self, other: &Self) -> Result<(), BitsetError> {
        self.check_same_size(other)?;
        self.bits |= other.bits;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sizes differ.
    pub fn xor_assign(&mut self, other: &Self) -> Result<(), BitsetError> {
        self.check_same_size(other)?;
        self.bits ^= other.bits;
        Ok(())
    }

    /// Flips every slot in place.
    pub fn negate(&mut self) {
        self.bits = !self.bits & self.mask();
    }
}

impl Default for Bitset {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bits == other.bits
    }
}

impl Eq for Bitset {}

impl Hash for Bitset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        self.bits.hash(state);
    }
}

impl Index<usize> for Bitset {
    type Output = bool;

    fn index(&self, offset: usize) -> &bool {
        assert!(
            self.exists(offset),
            "offset out of range: {offset} for size {}",
            self.len
        );
        if self.bit(offset) { &true } else { &false }
    }
}

impl fmt::Display for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.iter() {
            f.write_str(if value { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn out_of_bounds_size_clamps_to_empty() {
        assert_eq!(Bitset::new(-1).size(), 0);
        assert_eq!(Bitset::new(0).size(), 0);
        assert_eq!(Bitset::new(64).size(), 0);
        assert_eq!(Bitset::new(62).size(), 0);
        assert_eq!(Bitset::new(61).size(), 61);
    }

    #[test]
    fn clamped_size_ignores_initializer() {
        let bitset = Bitset::from_values(100, [1, 1, 1]).unwrap();
        assert!(bitset.is_empty());
    }

    #[test]
    fn clamped_size_skips_sentinel_validation() {
        assert_eq!(Bitset::with_sentinels(100, 'A', "").unwrap().size(), 0);
        assert_eq!(Bitset::with_sentinels(-1, 'A', 'A').unwrap().size(), 0);
        let bitset = Bitset::with_initializer(0, ['x'], "", "").unwrap();
        assert!(bitset.is_empty());
    }

    #[test]
    fn initializer_longer_than_size_is_rejected() {
        let err = Bitset::from_values(2, [1, 0, 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn initializer_value_outside_sentinels_is_rejected() {
        let err = Bitset::from_values(3, [1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn empty_false_sentinel_is_rejected() {
        let err = Bitset::with_sentinels(4, 'A', "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn set_at_size_appends() {
        let mut bitset = Bitset::new(2);
        bitset.set(2, 1).unwrap();
        assert_eq!(bitset.size(), 3);
        assert_eq!(bitset.to_string(), "001");

        let err = bitset.set(4, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(bitset.size(), 3);
    }

    #[test]
    fn set_cannot_grow_past_max_capacity() {
        let mut bitset = Bitset::new(61);
        let err = bitset.set_bit(61, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(bitset.size(), MAX_CAPACITY);
    }

    #[test]
    fn set_overwrites_existing_slot() {
        let mut bitset = Bitset::from_values(3, [1, 1, 1]).unwrap();
        bitset.set(1, 0).unwrap();
        assert_eq!(bitset.to_string(), "101");
        assert_eq!(bitset.size(), 3);
    }

    #[test]
    fn set_rejects_unresolvable_value() {
        let mut bitset = Bitset::new(3);
        let err = bitset.set(0, 'x').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(bitset.none());
    }

    #[test]
    fn unset_removes_and_shifts() {
        let mut bitset = Bitset::from_values(5, [1, 0, 1, 1, 0]).unwrap();
        assert_eq!(bitset.unset(1), Some(false));
        assert_eq!(bitset.size(), 4);
        assert_eq!(bitset.to_string(), "1110");
        assert_eq!(bitset.unset(3), Some(false));
        assert_eq!(bitset.to_string(), "111");
        assert_eq!(bitset.unset(3), None);
        assert_eq!(bitset.size(), 3);
    }

    #[test]
    fn exists_covers_only_present_slots() {
        let bitset = Bitset::new(4);
        assert!(bitset.exists(0));
        assert!(bitset.exists(3));
        assert!(!bitset.exists(4));
        assert!(!Bitset::new(0).exists(0));
    }

    #[test]
    fn get_checks_bounds() {
        let bitset = Bitset::from_values(2, [0, 1]).unwrap();
        assert!(!bitset.get(0).unwrap());
        assert!(bitset.get(1).unwrap());
        assert_eq!(bitset.get(2).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn aggregates_on_empty() {
        let bitset = Bitset::new(0);
        assert!(bitset.all());
        assert!(!bitset.any());
        assert!(bitset.none());
    }

    #[test]
    fn test_scans_prefix() {
        let bitset = Bitset::from_values(4, [1, 1, 0, 1]).unwrap();
        assert!(bitset.test(1, Some(TestMode::All)).unwrap());
        assert!(!bitset.test(2, Some(TestMode::All)).unwrap());
        assert!(bitset.test(0, Some(TestMode::Any)).unwrap());
        assert!(!bitset.test(3, Some(TestMode::None)).unwrap());
        assert!(!bitset.test(2, None).unwrap());
        assert!(bitset.test(4, None).is_err());
    }

    #[test]
    fn to_int_is_big_endian() {
        assert_eq!(Bitset::from_values(3, [1, 0, 0]).unwrap().to_int(), 4);
        assert_eq!(Bitset::from_values(3, [0, 0, 1]).unwrap().to_int(), 1);
        assert_eq!(Bitset::new(0).to_int(), 0);
    }

    #[test]
    fn max_capacity_all_set() {
        let bitset = Bitset::from_values(61, std::iter::repeat_n(1, 61)).unwrap();
        assert_eq!(bitset.to_int(), (1 << 61) - 1);
        assert_eq!(bitset.count(), 61);
    }

    #[test]
    fn negate_keeps_padding_clear() {
        let mut bitset = Bitset::from_values(3, [1, 0, 0]).unwrap();
        bitset.negate();
        assert_eq!(bitset.to_string(), "011");
        assert_eq!(bitset.count(), 2);
        assert_eq!(bitset, Bitset::from_values(3, [0, 1, 1]).unwrap());
    }

    #[test]
    fn equality_ignores_sentinels() {
        let letters = Bitset::with_initializer(3, ['A', 'B', 'A'], 'A', 'B').unwrap();
        let numbers = Bitset::from_values(3, [1, 0, 1]).unwrap();
        assert_eq!(letters, numbers);
    }

    #[test]
    #[should_panic(expected = "offset out of range")]
    fn index_panics_out_of_range() {
        let bitset = Bitset::new(2);
        let _ = bitset[2];
    }
}
