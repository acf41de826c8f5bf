//! Proof-of-work search

use crate::blockchain::core::chain::Block;
use crate::crypto::meets_difficulty;
use tracing::debug;

/// Increment the nonce and recompute the block digest until it carries
/// `difficulty` leading zero hex digits.
///
/// This is an unbounded, CPU-bound busy loop with no cancellation; expected
/// cost grows as 16^difficulty hash attempts, so callers keep difficulty in
/// the 1..=5 demo range.
pub fn mine(block: &mut Block, difficulty: u8) {
    while !meets_difficulty(&block.hash, difficulty) {
        block.nonce += 1;
        block.hash = block.calculate_hash();
    }
    debug!(nonce = block.nonce, difficulty, hash = %block.hash, "block mined");
}
