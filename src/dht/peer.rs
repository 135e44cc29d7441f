use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::types::UInt128;

/// Minimal view of a remote peer that buckets and lookups rely on
///
/// Transport layers supply their own peer representations. The distance is
/// relative to a fixed local identifier, so whoever builds the peer computes
/// `local_id ^ kad_id` once and exposes it here.
pub trait KadPeer: Send + Sync {
    /// Identifier of the peer in the key space
    fn kad_id(&self) -> UInt128;
    /// XOR distance between the local node and this peer
    fn kad_distance(&self) -> UInt128;
    /// Where the peer can be reached
    fn address(&self) -> SocketAddr;
}

impl<T: KadPeer + ?Sized> KadPeer for Arc<T> {
    fn kad_id(&self) -> UInt128 {
        (**self).kad_id()
    }

    fn kad_distance(&self) -> UInt128 {
        (**self).kad_distance()
    }

    fn address(&self) -> SocketAddr {
        (**self).address()
    }
}

/// Plain peer record with a precomputed distance
#[derive(Clone, Debug)]
pub struct Contact {
    pub id: UInt128,
    pub distance: UInt128,
    pub address: SocketAddr,
}

impl Contact {
    pub fn new(local_id: &UInt128, id: UInt128, address: SocketAddr) -> Self {
        Self {
            id,
            distance: local_id.xor(&id),
            address,
        }
    }
}

impl KadPeer for Contact {
    fn kad_id(&self) -> UInt128 {
        self.id
    }

    fn kad_distance(&self) -> UInt128 {
        self.distance
    }

    fn address(&self) -> SocketAddr {
        self.address
    }
}

/// Contacts are the same peer when their identifiers match
impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contact({}, {})", self.id, self.address)
    }
}
