/// Packed bit view used for prefix and distance queries
pub mod bitset;
/// Fixed-width integer access inside byte buffers, hex and binary rendering
pub mod bytes;
/// 128-bit unsigned identifier of the overlay key space
pub mod uint128;

pub use bitset::BitSet;
pub use bytes::ByteOrder;
pub use uint128::UInt128;
