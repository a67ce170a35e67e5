//! Content hashing for interface models and signatures.
//!
//! Hashes cover the canonical JSON form of a value, so two structurally equal
//! models always hash the same regardless of where they were loaded from.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Compute the SHA-256 content hash of any serializable value.
pub fn content_hash<T: Serialize>(value: &T) -> ContentHash {
    // Model types hold only strings, vecs, options and unit enums, which
    // always serialize.
    let json = serde_json::to_vec(value).expect("serialization should not fail");
    let mut hasher = Sha256::new();
    hasher.update(&json);
    hasher.finalize().into()
}

/// Format a content hash as a hex string.
pub fn hash_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Fold a value's content hash into a 16-bit checksum (first two bytes, big-endian).
pub fn checksum16<T: Serialize>(value: &T) -> u16 {
    let hash = content_hash(value);
    u16::from_be_bytes([hash[0], hash[1]])
}
