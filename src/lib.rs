//! Kad Core
//!
//! Addressing and peer-grouping primitives for a Kademlia-style DHT overlay.
//!
//! ## Features
//! - 128-bit identifiers with XOR distance and unsigned ordering (`UInt128`).
//! - Bit-level view over identifier bytes for prefix and distance queries (`BitSet`).
//! - Nearest-peer selection by shared identifier prefix.
//! - Bounded, thread-safe k-buckets (`KBucket`) over any `KadPeer` implementation.
//!
//! Routing tables, wire protocols, lookups and persistence live in higher
//! layers that build on these types.
//!
//! ```
//! use std::net::SocketAddr;
//! use kad_core::{Contact, KBucket, UInt128};
//!
//! let local = UInt128::random();
//! let bucket = KBucket::new();
//! let peer = Contact::new(&local, UInt128::random(), SocketAddr::from(([127, 0, 0, 1], 4672)));
//! bucket.add(peer.clone()).unwrap();
//! assert!(bucket.contains(&peer));
//! assert_eq!(bucket.get_nearest(&peer.id, 1), vec![peer]);
//! ```

/// Configuration Module
pub mod config;
/// Kademlia core exceptions
pub mod exceptions;
/// Module for logging and registration of events
pub mod logger;

/// Peers, nearest selection and k-buckets
pub mod dht;
/// Identifier, bit view and byte helpers
pub mod types;
/// Key hashing into the identifier space
pub mod utils;

pub use config::{Config, DHTConfig};
pub use dht::{Contact, KBucket, KadPeer, MAX_BUCKET_SIZE, select_nearest};
pub use exceptions::{KadError, Result};
pub use types::{BitSet, ByteOrder, UInt128};
