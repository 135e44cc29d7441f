//! Nearest-peer selection
//!
//! Peers are ranked by how many leading bits their identifier shares with the
//! target: a longer common prefix means a smaller XOR distance, so the peer
//! with the longest prefix is the nearest one. When several peers share the
//! same prefix length the first one in iteration order wins.

use std::collections::HashSet;

use crate::dht::peer::KadPeer;
use crate::types::UInt128;

/// Length of the prefix shared by `target` and `id`
///
/// Computed from the bit view of `target ^ id`: the index of its first set
/// bit from the most significant end. Identical identifiers share all 128
/// bits, which the bit view alone would report as index 0.
pub fn shared_prefix_len(target: &UInt128, id: &UInt128) -> usize {
    target
        .xor(id)
        .to_bit_set()
        .first_set()
        .unwrap_or(UInt128::SIZE_BITS)
}

/// Pick the peer nearest to `target`, skipping identifiers in `exclude`
///
/// Returns `None` when every candidate is excluded or the list is empty.
pub fn select_nearest<'a, P: KadPeer>(
    peers: &'a [P],
    target: &UInt128,
    exclude: &HashSet<UInt128>,
) -> Option<&'a P> {
    let mut best: Option<(&P, usize)> = None;

    for peer in peers {
        let id = peer.kad_id();
        if exclude.contains(&id) {
            continue;
        }
        let rank = shared_prefix_len(target, &id);
        match best {
            Some((_, best_rank)) if rank <= best_rank => {}
            _ => best = Some((peer, rank)),
        }
    }

    best.map(|(peer, _)| peer)
}
