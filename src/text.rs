use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use winnow::{Parser, combinator::repeat, token::one_of};

use crate::BitsetError;
use crate::bit_set::{Bitset, MAX_CAPACITY};
use crate::raw_value::Sentinels;

fn slots(input: &mut &str) -> winnow::Result<Vec<bool>> {
    repeat(0..=MAX_CAPACITY, one_of(['0', '1']).map(|digit: char| digit == '1')).parse_next(input)
}

impl Bitset {
    /// Reads the textual form written by `Display`: one `'0'` or `'1'` per
    /// slot. The result uses `'1'`/`'0'` as its sentinel pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` on any other character or when the string
    /// is longer than [`MAX_CAPACITY`].
    pub fn from_string(text: &str) -> Result<Self, BitsetError> {
        let values = slots
            .parse(text)
            .map_err(|e| BitsetError::Parse(e.to_string()))?;
        Ok(Self::from_slots(&values, Sentinels::binary_digits()))
    }
}

impl FromStr for Bitset {
    type Err = BitsetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_string(text)
    }
}

impl Serialize for Bitset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bitset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, RawValue};

    #[test]
    fn parses_digits_in_index_order() {
        let bitset: Bitset = "0110".parse().unwrap();
        assert_eq!(bitset.size(), 4);
        assert!(!bitset[0]);
        assert!(bitset[1]);
        assert!(bitset[2]);
        assert!(!bitset[3]);
    }

    #[test]
    fn installs_digit_sentinels() {
        let mut bitset = Bitset::from_string("00").unwrap();
        assert_eq!(bitset.true_value(), &RawValue::from('1'));
        assert_eq!(bitset.false_value(), &RawValue::from('0'));
        bitset.set(0, '1').unwrap();
        assert_eq!(bitset.to_string(), "10");
    }

    #[test]
    fn empty_string_is_empty_bitset() {
        assert!(Bitset::from_string("").unwrap().is_empty());
    }

    #[test]
    fn rejects_foreign_characters() {
        let err = Bitset::from_string("01a1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(Bitset::from_string(" 01").is_err());
    }

    #[test]
    fn rejects_overlong_input() {
        let text = "1".repeat(MAX_CAPACITY + 1);
        let err = Bitset::from_string(&text).unwrap_err();
        assert!(matches!(err, BitsetError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Bitset::from_string(&text[1..]).unwrap().count(), MAX_CAPACITY);
    }
}
