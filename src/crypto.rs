//! Digest primitives for QuorumChain
//!
//! The simulation treats the hash function as a platform-supplied
//! collision-resistant primitive; everything downstream works with
//! hex-encoded digests.

use sha2::{Digest as _, Sha256};

/// Hex-encoded SHA-256 digest, used as a block or transaction-set fingerprint.
pub type Digest = String;

/// Opaque node/account identifier.
pub type Address = String;

/// Reserved sender sentinel: minted value, no debit applied.
pub const SYSTEM_ADDRESS: &str = "System";

/// Previous-hash sentinel carried only by the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";

/// Hash arbitrary string data into a lowercase hex digest.
pub fn sha256_hex(data: &str) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// A digest meets `difficulty` when it starts with at least that many zero
/// hex digits.
pub fn meets_difficulty(digest: &str, difficulty: u8) -> bool {
    let required = difficulty as usize;
    digest.len() >= required && digest.bytes().take(required).all(|b| b == b'0')
}
