use crate::blockchain::core::chain::HashChain;

/// Walk the chain front-to-back and check internal consistency: every
/// stored block digest against a fresh recomputation, every non-genesis
/// transaction digest against its payload, and every link against the
/// preceding block's digest.
///
/// The proof-of-work threshold is deliberately not re-checked here. A chain
/// is *valid* when it is internally consistent; whether a block meets the
/// work requirement is judged per voter at proposal time.
pub fn validate_chain(chain: &HashChain) -> bool {
    let genesis = match chain.blocks.first() {
        Some(block) => block,
        None => return false,
    };

    if genesis.hash != genesis.calculate_hash() {
        return false;
    }

    for pair in chain.blocks.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if current.hash != current.calculate_hash() {
            return false;
        }
        if current.tx_digest != current.calculate_tx_digest() {
            return false;
        }
        if current.previous_hash != previous.hash {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    fn chain_with_two_blocks() -> HashChain {
        let mut chain = HashChain::new(1, "01/01/2025");
        chain.append_block("Block_1", vec![Transaction::mint("@alice", 100.0)]);
        chain
    }

    #[test]
    fn consistent_chain_validates() {
        assert!(validate_chain(&chain_with_two_blocks()));
    }

    #[test]
    fn stale_block_hash_fails() {
        let mut chain = chain_with_two_blocks();
        chain.blocks[1].timestamp = "rewritten".to_string();
        assert!(!validate_chain(&chain));
    }

    #[test]
    fn stale_tx_digest_fails() {
        let mut chain = chain_with_two_blocks();
        chain.blocks[1].transactions[0].amount = 1_000_000.0;
        assert!(!validate_chain(&chain));
    }

    #[test]
    fn broken_linkage_fails() {
        let mut chain = chain_with_two_blocks();
        chain.append_block("Block_2", vec![Transaction::mint("@bob", 10.0)]);
        // Rewrite the middle block's digest consistently with its own
        // contents; the successor's link is now dangling.
        chain.blocks[1].nonce += 1;
        chain.blocks[1].hash = chain.blocks[1].calculate_hash();
        assert!(!validate_chain(&chain));
    }

    #[test]
    fn tampered_genesis_hash_fails() {
        let mut chain = chain_with_two_blocks();
        chain.blocks[0].timestamp = "02/01/2025".to_string();
        assert!(!validate_chain(&chain));
    }
}
