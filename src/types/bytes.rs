//! Raw byte buffer helpers
//!
//! Fixed-width integer access at arbitrary offsets of a byte slice, plus the
//! diagnostic hex and binary renderings shared by [`UInt128`](super::UInt128)
//! and [`BitSet`](super::BitSet).

use crate::exceptions::BytesError;

const U64_WIDTH: usize = 8;

/// Byte order used when reading or writing multi-byte integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first (network order)
    Big,
    /// Least significant byte first
    Little,
}

impl ByteOrder {
    /// Byte order of the host
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

fn window(buf_len: usize, offset: usize) -> Result<std::ops::Range<usize>, BytesError> {
    match offset.checked_add(U64_WIDTH) {
        Some(end) if end <= buf_len => Ok(offset..end),
        _ => Err(BytesError::OutOfBounds {
            offset,
            width: U64_WIDTH,
            len: buf_len,
        }),
    }
}

/// Read an unsigned 64-bit value stored at `offset`
pub fn read_u64_at(buf: &[u8], offset: usize, order: ByteOrder) -> Result<u64, BytesError> {
    let range = window(buf.len(), offset)?;
    let mut raw = [0u8; U64_WIDTH];
    raw.copy_from_slice(&buf[range]);
    Ok(match order {
        ByteOrder::Big => u64::from_be_bytes(raw),
        ByteOrder::Little => u64::from_le_bytes(raw),
    })
}

/// Write an unsigned 64-bit value at `offset`
///
/// Nothing is written when the 8-byte window does not fit.
pub fn write_u64_at(
    buf: &mut [u8],
    offset: usize,
    value: u64,
    order: ByteOrder,
) -> Result<(), BytesError> {
    let range = window(buf.len(), offset)?;
    let raw = match order {
        ByteOrder::Big => value.to_be_bytes(),
        ByteOrder::Little => value.to_le_bytes(),
    };
    buf[range].copy_from_slice(&raw);
    Ok(())
}

/// Read a two's-complement 64-bit value stored at `offset`
pub fn read_i64_at(buf: &[u8], offset: usize, order: ByteOrder) -> Result<i64, BytesError> {
    read_u64_at(buf, offset, order).map(|v| v as i64)
}

/// Write a two's-complement 64-bit value at `offset`
pub fn write_i64_at(
    buf: &mut [u8],
    offset: usize,
    value: i64,
    order: ByteOrder,
) -> Result<(), BytesError> {
    write_u64_at(buf, offset, value as u64, order)
}

/// Lowercase hex, two digits per byte
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Binary rendering, 8 digits per byte, bytes separated by a space
pub fn to_bin(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:08b}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode a hex string (either case) into bytes
pub fn decode_hex(s: &str) -> Result<Vec<u8>, BytesError> {
    Ok(hex::decode(s)?)
}

/// Binary rendering of a u64 in big endian byte order
pub fn u64_to_bin(value: u64) -> String {
    to_bin(&value.to_be_bytes())
}

/// Binary rendering of an i64 in big endian byte order
pub fn i64_to_bin(value: i64) -> String {
    to_bin(&value.to_be_bytes())
}
