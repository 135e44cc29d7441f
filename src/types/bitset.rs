//! Bit-level view over identifier bytes
//!
//! Bits are packed most significant first, so bit `0` is the top bit of
//! byte `0`. Prefix and distance queries on [`UInt128`](super::UInt128) go
//! through this view.

use std::fmt;

use crate::exceptions::BitSetError;
use crate::types::bytes;

/// Fixed-size set of bits backed by a packed byte buffer
///
/// Bit `0` is the most significant bit of the first byte, so a set built from
/// `[0x0A, 0x2E]` reads `0000 1010 0010 1110` from index `0` upwards.
/// Padding bits in the last byte are always zero, which keeps the derived
/// equality and hash consistent with the logical bit content.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSet {
    /// Create a set of `len` cleared bits
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len.div_ceil(8)],
            len,
        }
    }

    /// View a byte buffer as `data.len() * 8` bits
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            bytes: data.to_vec(),
            len: data.len() * 8,
        }
    }

    /// Build from explicit bit values
    pub fn from_bools(data: &[bool]) -> Self {
        let mut set = Self::new(data.len());
        for (index, &value) in data.iter().enumerate() {
            set.put(index, value);
        }
        set
    }

    /// Build from integer flags, any nonzero value sets the bit
    pub fn from_flags(data: &[i32]) -> Self {
        let mut set = Self::new(data.len());
        for (index, &flag) in data.iter().enumerate() {
            set.put(index, flag != 0);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Underlying packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn mask(index: usize) -> u8 {
        0x80 >> (index % 8)
    }

    fn check(&self, index: usize) -> Result<(), BitSetError> {
        if index < self.len {
            Ok(())
        } else {
            Err(BitSetError::OutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    // index must already be checked
    fn bit(&self, index: usize) -> bool {
        self.bytes[index / 8] & Self::mask(index) != 0
    }

    // index must already be checked
    fn put(&mut self, index: usize, value: bool) {
        if value {
            self.bytes[index / 8] |= Self::mask(index);
        } else {
            self.bytes[index / 8] &= !Self::mask(index);
        }
    }

    /// Read the bit at `index`
    pub fn get(&self, index: usize) -> Result<bool, BitSetError> {
        self.check(index)?;
        Ok(self.bit(index))
    }

    /// Write the bit at `index`
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), BitSetError> {
        self.check(index)?;
        self.put(index, value);
        Ok(())
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterate over the bits, most significant first
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| self.bit(index))
    }

    /// Index of the first set bit scanning from the most significant end,
    /// `None` when no bit is set
    pub fn first_set(&self) -> Option<usize> {
        self.bytes
            .iter()
            .position(|&b| b != 0)
            .map(|byte| byte * 8 + self.bytes[byte].leading_zeros() as usize)
    }

    /// Index of the first set bit scanning from the most significant end
    ///
    /// Returns `0` when no bit is set at all, which is indistinguishable from
    /// "bit 0 is set". Callers that care about the empty case must use
    /// [`BitSet::first_set`] or [`BitSet::count_ones`] instead.
    pub fn first_set_from_msb(&self) -> usize {
        self.first_set().unwrap_or(0)
    }

    /// Lowercase hex of the packed bytes
    pub fn to_hex(&self) -> String {
        bytes::to_hex(&self.bytes)
    }

    /// Packed bytes as 8-digit binary groups
    pub fn to_bin(&self) -> String {
        bytes::to_bin(&self.bytes)
    }
}

impl From<&[u8]> for BitSet {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}

impl From<&[bool]> for BitSet {
    fn from(data: &[bool]) -> Self {
        Self::from_bools(data)
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.iter().enumerate() {
            if index > 0 && index % 8 == 0 {
                f.write_str(" ")?;
            }
            f.write_str(if value { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_from_bytes_and_flags() {
        let from_bytes = BitSet::from_bytes(&[0x0A, 0x2E]);
        let from_flags = BitSet::from_flags(&[0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 0]);
        assert_eq!(from_bytes, from_flags);

        let bools: Vec<bool> = from_flags.iter().collect();
        assert_eq!(BitSet::from_bools(&bools), from_bytes);
    }

    #[test]
    fn test_get_and_set() {
        let mut set = BitSet::new(12);
        assert_eq!(set.len(), 12);
        assert!(!set.get(3).unwrap());

        set.set(3, true).unwrap();
        set.set(11, true).unwrap();
        assert!(set.get(3).unwrap());
        assert!(set.get(11).unwrap());
        assert_eq!(set.count_ones(), 2);

        set.set(3, false).unwrap();
        assert!(!set.get(3).unwrap());
        assert_eq!(set.as_bytes(), &[0x00, 0x10]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut set = BitSet::new(10);
        assert_eq!(
            set.get(10),
            Err(BitSetError::OutOfBounds { index: 10, len: 10 })
        );
        assert!(set.set(64, true).is_err());
        assert_eq!(set.count_ones(), 0);
    }

    #[test]
    fn test_first_set_from_msb() {
        let set = BitSet::from_bytes(&[0x00, 0x2E]);
        assert_eq!(set.first_set(), Some(10));
        assert_eq!(set.first_set_from_msb(), 10);

        let top = BitSet::from_bytes(&[0x80, 0x00]);
        assert_eq!(top.first_set_from_msb(), 0);

        // All-zero and "bit 0 set" collapse to the same answer
        let empty = BitSet::from_bytes(&[0x00, 0x00]);
        assert_eq!(empty.first_set_from_msb(), 0);
        assert_eq!(empty.first_set(), None);
    }

    #[test]
    fn test_equality_needs_same_length() {
        assert_ne!(BitSet::new(8), BitSet::new(16));
        assert_ne!(BitSet::new(7), BitSet::new(8));
    }

    #[test]
    fn test_display() {
        let set = BitSet::from_bytes(&[0x0A, 0x2E]);
        assert_eq!(set.to_string(), "00001010 00101110");
        assert_eq!(set.to_bin(), "00001010 00101110");
        assert_eq!(set.to_hex(), "0a2e");
        assert_eq!(BitSet::from_flags(&[1, 0, 1]).to_string(), "101");
    }
}
