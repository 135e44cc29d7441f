use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::net::SocketAddr;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::DHTConfig;
use crate::dht::nearest::select_nearest;
use crate::dht::peer::KadPeer;
use crate::exceptions::BucketError;
use crate::types::UInt128;

/// Default number of peers a bucket holds
pub const MAX_BUCKET_SIZE: usize = 16;

/// Bounded, thread-safe group of peers sharing a distance prefix to the local node
///
/// Peers are unique by identifier and kept in insertion order, re-adding a
/// peer moves it to the back. Every operation takes the lock for its own body
/// only, and reads hand out copies rather than references into the bucket.
pub struct KBucket<P> {
    capacity: usize,
    peers: Mutex<VecDeque<P>>,
}

impl<P: KadPeer + Clone> KBucket<P> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUCKET_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            peers: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn from_config(config: &DHTConfig) -> Self {
        Self::with_capacity(config.bucket_size)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of peers in the bucket
    pub fn count(&self) -> usize {
        self.peers.lock().len()
    }

    /// Number of free slots
    pub fn left(&self) -> usize {
        self.capacity.saturating_sub(self.count())
    }

    pub fn is_full(&self) -> bool {
        self.left() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Add a peer, refreshing it if already present
    ///
    /// An existing entry with the same identifier is dropped before the
    /// capacity check, so refreshing never fails on a full bucket.
    pub fn add(&self, peer: P) -> Result<(), BucketError> {
        let id = peer.kad_id();
        let mut peers = self.peers.lock();

        let refreshed = match peers.iter().position(|p| p.kad_id() == id) {
            Some(index) => {
                peers.remove(index);
                true
            }
            None => false,
        };

        if peers.len() >= self.capacity {
            warn!(peer = %id, capacity = self.capacity, "Bucket full, peer rejected");
            return Err(BucketError::Full {
                capacity: self.capacity,
            });
        }

        peers.push_back(peer);
        debug!(peer = %id, refreshed, count = peers.len(), "Peer added to bucket");
        Ok(())
    }

    /// Remove a peer, doing nothing if it is absent
    pub fn remove(&self, peer: &P) {
        self.remove_by_id(&peer.kad_id());
    }

    /// Remove a peer by identifier and return it
    pub fn remove_by_id(&self, id: &UInt128) -> Option<P> {
        let mut peers = self.peers.lock();
        let index = peers.iter().position(|p| &p.kad_id() == id)?;
        debug!(peer = %id, "Peer removed from bucket");
        peers.remove(index)
    }

    /// Remove every peer
    pub fn clear(&self) {
        let mut peers = self.peers.lock();
        debug!(count = peers.len(), "Bucket cleared");
        peers.clear();
    }

    pub fn contains(&self, peer: &P) -> bool {
        self.contains_id(&peer.kad_id())
    }

    pub fn contains_id(&self, id: &UInt128) -> bool {
        self.peers.lock().iter().any(|p| &p.kad_id() == id)
    }

    /// Look up a peer by identifier
    pub fn get(&self, id: &UInt128) -> Option<P> {
        self.peers
            .lock()
            .iter()
            .find(|p| &p.kad_id() == id)
            .cloned()
    }

    /// Look up a peer by network address
    pub fn get_by_address(&self, address: &SocketAddr) -> Option<P> {
        self.peers
            .lock()
            .iter()
            .find(|p| &p.address() == address)
            .cloned()
    }

    /// Peer that has gone longest without being added or refreshed
    ///
    /// This is the eviction candidate when [`KBucket::add`] reports a full bucket.
    pub fn oldest(&self) -> Option<P> {
        self.peers.lock().front().cloned()
    }

    /// Snapshot of all peers in insertion order
    pub fn get_all(&self) -> Vec<P> {
        self.peers.lock().iter().cloned().collect()
    }

    /// Up to `count` distinct peers sampled uniformly at random
    ///
    /// When the bucket holds `count` peers or fewer, all of them are returned.
    pub fn get_random(&self, count: usize) -> Vec<P> {
        let peers = self.peers.lock();
        if peers.len() <= count {
            return peers.iter().cloned().collect();
        }

        let mut all: Vec<&P> = peers.iter().collect();
        let (sample, _) = all.partial_shuffle(&mut rand::thread_rng(), count);
        sample.iter().map(|&p| p.clone()).collect()
    }

    /// Up to `count` peers nearest to `target`, nearest first
    ///
    /// Selection repeatedly picks the nearest remaining peer, which keeps the
    /// first-encountered tie-break of [`select_nearest`]. Buckets holding
    /// `count` peers or fewer are returned whole, still nearest first. The
    /// ranking runs on a snapshot, outside the lock.
    pub fn get_nearest(&self, target: &UInt128, count: usize) -> Vec<P> {
        let snapshot = self.get_all();
        let wanted = count.min(snapshot.len());

        let mut chosen: Vec<P> = Vec::with_capacity(wanted);
        let mut exclude: HashSet<UInt128> = HashSet::with_capacity(wanted);
        while chosen.len() < wanted {
            let Some(peer) = select_nearest(&snapshot, target, &exclude) else {
                break;
            };
            exclude.insert(peer.kad_id());
            chosen.push(peer.clone());
        }
        chosen
    }
}

impl<P: KadPeer + Clone> Default for KBucket<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: KadPeer + Clone> fmt::Display for KBucket<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peers = self.get_all();
        writeln!(f, "KBucket ({}/{}) {{", peers.len(), self.capacity)?;
        for peer in &peers {
            writeln!(f, "\t{}", peer.kad_id())?;
        }
        f.write_str("}")
    }
}

impl<P: KadPeer + Clone> fmt::Debug for KBucket<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KBucket")
            .field("capacity", &self.capacity)
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::peer::Contact;

    fn random_contact() -> Contact {
        Contact::new(
            &UInt128::ZERO,
            UInt128::random(),
            SocketAddr::from(([127, 0, 0, 1], 4672)),
        )
    }

    fn contact(id: u128) -> Contact {
        Contact::new(
            &UInt128::ZERO,
            UInt128::from(id),
            SocketAddr::from(([127, 0, 0, 1], 4672)),
        )
    }

    fn ids(peers: &[Contact]) -> Vec<UInt128> {
        peers.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_capacity() {
        let bucket: KBucket<Contact> = KBucket::new();
        for i in 0..MAX_BUCKET_SIZE {
            assert!(!bucket.is_full());
            bucket.add(contact(i as u128 + 1)).unwrap();
            assert_eq!(bucket.count(), i + 1);
        }
        assert!(bucket.is_full());
        assert_eq!(bucket.left(), 0);

        let err = bucket.add(contact(1000)).unwrap_err();
        assert_eq!(err, BucketError::Full { capacity: 16 });
        assert_eq!(bucket.count(), MAX_BUCKET_SIZE);
        assert!(!bucket.contains_id(&UInt128::from(1000u16)));
    }

    #[test]
    fn test_refresh_on_full_bucket() {
        let bucket = KBucket::with_capacity(3);
        bucket.add(contact(1)).unwrap();
        bucket.add(contact(2)).unwrap();
        bucket.add(contact(3)).unwrap();
        assert!(bucket.is_full());

        bucket.add(contact(1)).unwrap();
        assert_eq!(bucket.count(), 3);
        assert_eq!(
            ids(&bucket.get_all()),
            vec![UInt128::from(2u8), UInt128::from(3u8), UInt128::from(1u8)]
        );
    }

    #[test]
    fn test_refresh_with_one_free_slot() {
        let bucket = KBucket::new();
        let peers: Vec<Contact> = (0..MAX_BUCKET_SIZE - 1).map(|_| random_contact()).collect();
        for peer in &peers {
            bucket.add(peer.clone()).unwrap();
        }
        assert_eq!(bucket.left(), 1);

        bucket.add(peers[3].clone()).unwrap();
        assert_eq!(bucket.count(), MAX_BUCKET_SIZE - 1);
        assert_eq!(bucket.left(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let bucket = KBucket::new();
        let a = contact(10);
        let b = contact(20);
        bucket.add(a.clone()).unwrap();
        bucket.add(b.clone()).unwrap();

        bucket.remove(&a);
        assert!(!bucket.contains(&a));
        assert!(bucket.contains(&b));

        // absent peer is a no-op
        bucket.remove(&a);
        assert_eq!(bucket.count(), 1);
        assert_eq!(bucket.remove_by_id(&b.id), Some(b.clone()));
        assert!(bucket.remove_by_id(&b.id).is_none());

        bucket.add(a).unwrap();
        bucket.add(b).unwrap();
        bucket.clear();
        assert!(bucket.is_empty());
        assert_eq!(bucket.left(), MAX_BUCKET_SIZE);
    }

    #[test]
    fn test_get() {
        let bucket = KBucket::new();
        let peer = random_contact();
        bucket.add(peer.clone()).unwrap();

        let found = bucket.get(&peer.id).unwrap();
        assert_eq!(found.address, peer.address);
        assert!(bucket.get(&UInt128::MAX).is_none());
        assert!(bucket.contains_id(&peer.id));
    }

    #[test]
    fn test_get_random() {
        let bucket = KBucket::new();
        let peers: Vec<Contact> = (0..10).map(|_| random_contact()).collect();
        for peer in &peers {
            bucket.add(peer.clone()).unwrap();
        }

        let all = bucket.get_random(10);
        assert_eq!(ids(&all), ids(&peers));
        assert_eq!(bucket.get_random(50).len(), 10);

        let sample = bucket.get_random(4);
        assert_eq!(sample.len(), 4);
        let distinct: HashSet<UInt128> = sample.iter().map(|p| p.id).collect();
        assert_eq!(distinct.len(), 4);
        assert!(sample.iter().all(|p| bucket.contains(p)));

        assert!(bucket.get_random(0).is_empty());
    }

    #[test]
    fn test_get_nearest() {
        let bucket = KBucket::new();
        for id in [0b0001u128, 0b1011, 1 << 100, 0b1001, 0b1100] {
            bucket.add(contact(id)).unwrap();
        }
        let target = UInt128::from(0b1000u8);

        let nearest = bucket.get_nearest(&target, 3);
        assert_eq!(
            ids(&nearest),
            vec![
                UInt128::from(0b1001u8),
                UInt128::from(0b1011u8),
                UInt128::from(0b1100u8)
            ]
        );

        // small buckets are returned whole
        assert_eq!(bucket.get_nearest(&target, 5).len(), 5);
        assert_eq!(bucket.get_nearest(&target, 16).len(), 5);
    }

    #[test]
    fn test_get_nearest_orders_small_bucket() {
        let bucket = KBucket::new();
        bucket.add(contact(1 << 100)).unwrap();
        bucket.add(contact(0b1001)).unwrap();
        let target = UInt128::from(0b1000u8);

        assert_eq!(
            ids(&bucket.get_nearest(&target, 2)),
            vec![UInt128::from(0b1001u8), UInt128::from(1u128 << 100)]
        );
        assert_eq!(
            ids(&bucket.get_nearest(&target, 16)),
            vec![UInt128::from(0b1001u8), UInt128::from(1u128 << 100)]
        );
    }

    #[test]
    fn test_get_by_address_and_oldest() {
        let bucket: KBucket<Contact> = KBucket::new();
        assert!(bucket.oldest().is_none());

        let local = UInt128::ZERO;
        let first = Contact::new(&local, UInt128::from(1u8), SocketAddr::from(([10, 0, 0, 1], 4672)));
        let second = Contact::new(&local, UInt128::from(2u8), SocketAddr::from(([10, 0, 0, 1], 4673)));
        bucket.add(first.clone()).unwrap();
        bucket.add(second.clone()).unwrap();

        assert_eq!(bucket.get_by_address(&second.address), Some(second.clone()));
        // same ip, different port
        assert!(bucket.get_by_address(&SocketAddr::from(([10, 0, 0, 1], 4674))).is_none());

        assert_eq!(bucket.oldest(), Some(first.clone()));
        // refreshing moves the peer to the back
        bucket.add(first.clone()).unwrap();
        assert_eq!(bucket.oldest(), Some(second));
    }

    #[test]
    fn test_get_nearest_matches_repeated_selection() {
        let bucket = KBucket::new();
        for _ in 0..MAX_BUCKET_SIZE {
            bucket.add(random_contact()).unwrap();
        }
        let target = UInt128::random();
        let snapshot = bucket.get_all();

        let nearest = bucket.get_nearest(&target, 6);
        assert_eq!(nearest.len(), 6);

        let mut exclude = HashSet::new();
        for peer in &nearest {
            let expected = select_nearest(&snapshot, &target, &exclude).unwrap();
            assert_eq!(expected.id, peer.id);
            exclude.insert(peer.id);
        }
    }

    #[test]
    fn test_from_config_and_display() {
        let config = DHTConfig {
            bucket_size: 2,
            ..DHTConfig::default()
        };
        let bucket = KBucket::from_config(&config);
        assert_eq!(bucket.capacity(), 2);

        bucket.add(contact(1)).unwrap();
        assert_eq!(
            bucket.to_string(),
            "KBucket (1/2) {\n\t00000000000000000000000000000001\n}"
        );
        assert_eq!(format!("{:?}", bucket), "KBucket { capacity: 2, count: 1 }");

        let default: KBucket<Contact> = KBucket::default();
        assert_eq!(default.capacity(), MAX_BUCKET_SIZE);
    }
}
