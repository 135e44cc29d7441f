/// Bounded, lock-guarded bucket of peers
pub mod kbucket;
/// Ranking peers by closeness to a target identifier
pub mod nearest;
/// Capability contract every peer representation satisfies
///
/// Contains:
/// - `KadPeer` - identifier, distance to the local node and address
/// - `Contact` - plain peer record implementing `KadPeer`
pub mod peer;

pub use kbucket::{KBucket, MAX_BUCKET_SIZE};
pub use nearest::select_nearest;
pub use peer::{Contact, KadPeer};
