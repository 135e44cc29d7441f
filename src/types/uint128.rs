//! 128-bit unsigned identifier
//!
//! Identifiers address both nodes and resources in the overlay key space.
//! The canonical layout is 16 bytes, most significant byte first, and is the
//! form any wire encoding must preserve byte for byte.

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Not, Shl, Shr, Sub};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::exceptions::IdentifierError;
use crate::types::bitset::BitSet;
use crate::types::bytes;

/// Fixed-width 128-bit unsigned integer made of two 64-bit limbs
///
/// The derived ordering compares `high` first and `low` second, both as
/// unsigned values, which is exactly unsigned 128-bit magnitude order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UInt128 {
    high: u64,
    low: u64,
}

impl UInt128 {
    pub const SIZE_BITS: usize = 128;
    pub const SIZE_BYTES: usize = Self::SIZE_BITS / 8;

    pub const ZERO: Self = Self::from_parts(0, 0);
    pub const MAX: Self = Self::from_parts(u64::MAX, u64::MAX);

    /// Build from the high and low 64-bit halves
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Build from the canonical 16-byte big endian layout
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self::from_u128(u128::from_be_bytes(bytes))
    }

    /// Build from a big endian buffer of any length
    ///
    /// Shorter buffers are zero-extended on the high side, longer ones keep
    /// their least significant 16 bytes.
    pub fn from_be_slice(data: &[u8]) -> Self {
        let mut raw = [0u8; 16];
        let take = data.len().min(Self::SIZE_BYTES);
        raw[Self::SIZE_BYTES - take..].copy_from_slice(&data[data.len() - take..]);
        Self::from_bytes(raw)
    }

    const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    /// Uniformly random identifier
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Uniformly random identifier drawn from `rng`
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut raw = [0u8; 16];
        rng.fill(&mut raw[..]);
        Self::from_bytes(raw)
    }

    pub const fn high(&self) -> u64 {
        self.high
    }

    pub const fn low(&self) -> u64 {
        self.low
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Canonical 16-byte big endian layout
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.to_u128().to_be_bytes()
    }

    pub const fn to_u8(&self) -> u8 {
        self.low as u8
    }

    pub const fn to_u16(&self) -> u16 {
        self.low as u16
    }

    pub const fn to_u32(&self) -> u32 {
        self.low as u32
    }

    pub const fn to_u64(&self) -> u64 {
        self.low
    }

    pub const fn to_i8(&self) -> i8 {
        self.low as i8
    }

    pub const fn to_i16(&self) -> i16 {
        self.low as i16
    }

    pub const fn to_i32(&self) -> i32 {
        self.low as i32
    }

    pub const fn to_i64(&self) -> i64 {
        self.low as i64
    }

    /// Low 64 bits read as a signed value, converted to floating point
    pub fn to_f64(&self) -> f64 {
        self.to_i64() as f64
    }

    /// Byte-wise exclusive-or, the overlay distance metric
    pub const fn xor(&self, other: &Self) -> Self {
        Self {
            high: self.high ^ other.high,
            low: self.low ^ other.low,
        }
    }

    /// Bit at `position`, where position `0` is the most significant bit
    pub fn get_bit(&self, position: usize) -> Option<bool> {
        if position >= Self::SIZE_BITS {
            return None;
        }
        Some((self.to_u128() >> (Self::SIZE_BITS - 1 - position)) & 1 == 1)
    }

    pub const fn leading_zeros(&self) -> u32 {
        self.to_u128().leading_zeros()
    }

    /// Number of leading bits shared with `other`, 128 when both are equal
    pub fn common_prefix_len(&self, other: &Self) -> usize {
        self.xor(other).leading_zeros() as usize
    }

    /// Bit view over the 16 bytes, most significant byte first
    pub fn to_bit_set(&self) -> BitSet {
        BitSet::from_bytes(&self.to_bytes())
    }

    /// Quotient and remainder of an unsigned division
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), IdentifierError> {
        let (n, d) = (self.to_u128(), divisor.to_u128());
        if d == 0 {
            return Err(IdentifierError::DivideByZero);
        }
        Ok((Self::from_u128(n / d), Self::from_u128(n % d)))
    }

    /// Render in `radix` with lowercase digits, `"0"` for zero
    pub fn to_base_string(&self, radix: u32) -> Result<String, IdentifierError> {
        if !(2..=36).contains(&radix) {
            return Err(IdentifierError::InvalidRadix { radix });
        }

        let mut value = self.to_u128();
        if value == 0 {
            return Ok("0".to_string());
        }

        let radix_wide = u128::from(radix);
        let mut digits = Vec::with_capacity(Self::SIZE_BITS);
        while value > 0 {
            // remainder is below 36 so the digit always exists
            let digit = std::char::from_digit((value % radix_wide) as u32, radix).unwrap_or('?');
            digits.push(digit);
            value /= radix_wide;
        }
        Ok(digits.iter().rev().collect())
    }

    pub fn to_hex(&self) -> String {
        bytes::to_hex(&self.to_bytes())
    }

    pub fn to_bin(&self) -> String {
        bytes::to_bin(&self.to_bytes())
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for UInt128 {
            fn from(value: $t) -> Self {
                Self::from_u128(value as u128)
            }
        }
    )*};
}

// Negative values extend with all-ones high bytes
macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for UInt128 {
            fn from(value: $t) -> Self {
                Self::from_u128(value as i128 as u128)
            }
        }
    )*};
}

from_unsigned!(u8, u16, u32, u64, u128);
from_signed!(i8, i16, i32, i64, i128);

impl From<[u8; 16]> for UInt128 {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<UInt128> for [u8; 16] {
    fn from(id: UInt128) -> Self {
        id.to_bytes()
    }
}

impl From<UInt128> for u128 {
    fn from(id: UInt128) -> Self {
        id.to_u128()
    }
}

impl From<UInt128> for String {
    fn from(id: UInt128) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for UInt128 {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for UInt128 {
    type Err = IdentifierError;

    /// Parse up to 32 hex digits, shorter input is zero-extended
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let raw = if digits.len() % 2 == 1 {
            hex::decode(format!("0{}", digits))?
        } else {
            hex::decode(digits)?
        };
        if raw.len() > Self::SIZE_BYTES {
            return Err(IdentifierError::TooLong { len: raw.len() });
        }
        Ok(Self::from_be_slice(&raw))
    }
}

impl BitXor for UInt128 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.xor(&rhs)
    }
}

impl BitXor<&UInt128> for &UInt128 {
    type Output = UInt128;

    fn bitxor(self, rhs: &UInt128) -> UInt128 {
        self.xor(rhs)
    }
}

impl BitAnd for UInt128 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_parts(self.high & rhs.high, self.low & rhs.low)
    }
}

impl BitOr for UInt128 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_parts(self.high | rhs.high, self.low | rhs.low)
    }
}

impl Not for UInt128 {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_parts(!self.high, !self.low)
    }
}

// Shifting by 128 bits or more clears the value
impl Shl<u32> for UInt128 {
    type Output = Self;

    fn shl(self, bits: u32) -> Self {
        Self::from_u128(self.to_u128().checked_shl(bits).unwrap_or(0))
    }
}

impl Shr<u32> for UInt128 {
    type Output = Self;

    fn shr(self, bits: u32) -> Self {
        Self::from_u128(self.to_u128().checked_shr(bits).unwrap_or(0))
    }
}

/// Wraps modulo 2^128
impl Add for UInt128 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_u128(self.to_u128().wrapping_add(rhs.to_u128()))
    }
}

/// Wraps modulo 2^128
impl Sub for UInt128 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_u128(self.to_u128().wrapping_sub(rhs.to_u128()))
    }
}

/// Wraps modulo 2^128
impl Mul for UInt128 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_u128(self.to_u128().wrapping_mul(rhs.to_u128()))
    }
}

impl fmt::Display for UInt128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::LowerHex for UInt128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for UInt128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt128({})", self.to_hex())
    }
}
