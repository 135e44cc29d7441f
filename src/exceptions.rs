use thiserror::Error;

/// Root error for the Kademlia core
#[derive(Error, Debug)]
pub enum KadError {
    #[error("Bucket error: {0}")]
    Bucket(#[from] BucketError),

    #[error("Bit set error: {0}")]
    BitSet(#[from] BitSetError),

    #[error("Byte buffer error: {0}")]
    Bytes(#[from] BytesError),

    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// K-bucket errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// The caller is expected to evict or route around, the bucket never evicts on its own
    #[error("Bucket full ({capacity} peers)")]
    Full { capacity: usize },
}

/// Bit access errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitSetError {
    #[error("Bit index {index} out of bounds for bit set of {len} bits")]
    OutOfBounds { index: usize, len: usize },
}

/// Errors of the raw byte helpers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BytesError {
    #[error("Cannot access {width} bytes at offset {offset} of a {len} byte buffer")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Identifier parsing and arithmetic errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentifierError {
    #[error("Identifier is {len} bytes long, at most 16 allowed")]
    TooLong { len: usize },

    #[error("Identifier string has no digits")]
    Empty,

    #[error("Division by zero")]
    DivideByZero,

    #[error("Radix {radix} not supported, expected 2 to 36")]
    InvalidRadix { radix: u32 },

    #[error("Invalid hex identifier: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Errors while persisting configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Handy result type for the crate
pub type Result<T> = std::result::Result<T, KadError>;
