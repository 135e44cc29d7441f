use sha2::{Digest, Sha256};

use crate::types::UInt128;

/// Hashing the key for DHT (SHA-256)
///
/// Args:
/// - key: The key for hashing
pub fn hash_key(key: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.finalize().into()
}

/// Identifier of a resource in the key space
///
/// Takes the first 16 bytes of the SHA-256 digest of `key`.
pub fn key_to_id(key: &[u8]) -> UInt128 {
    let hash = hash_key(key);
    let mut raw = [0u8; 16];
    raw.copy_from_slice(&hash[..16]);
    UInt128::from_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_known_vector() {
        assert_eq!(
            hex::encode(hash_key(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_key_to_id() {
        let id = key_to_id(b"abc");
        assert_eq!(id.to_string(), "ba7816bf8f01cfea414140de5dae2223");
        assert_eq!(id, key_to_id(b"abc"));
        assert_ne!(id, key_to_id(b"abd"));
    }
}
