use crate::crypto::{sha256_hex, Digest, GENESIS_PREV_HASH};
use crate::miner::mine;
use crate::transaction::Transaction;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// One link in the hash chain. The block digest covers timestamp, previous
/// hash and nonce; the transaction payload is bound separately through
/// `tx_digest`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub timestamp: String,
    pub transactions: Vec<Transaction>,
    pub previous_hash: Digest,
    pub hash: Digest,
    pub nonce: u32,
    pub tx_digest: Digest,
}

impl Block {
    pub fn new(timestamp: impl Into<String>, previous_hash: impl Into<Digest>) -> Self {
        let mut block = Block {
            timestamp: timestamp.into(),
            transactions: Vec::new(),
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
            tx_digest: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn calculate_hash(&self) -> Digest {
        sha256_hex(&format!(
            "{}{}{}",
            self.timestamp, self.previous_hash, self.nonce
        ))
    }

    pub fn calculate_tx_digest(&self) -> Digest {
        let mut data = String::new();
        for tx in &self.transactions {
            data.push_str(&tx.encode());
        }
        sha256_hex(&data)
    }

    /// Bind the transaction digest once the block's payload is complete.
    pub fn finalize_transactions(&mut self) {
        self.tx_digest = self.calculate_tx_digest();
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_PREV_HASH
    }
}

// HashChain: the ordered block sequence one node owns, plus its derived
// balance index.
use crate::blockchain::core::state::BalanceState;
use crate::blockchain::core::validation::validate_chain;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HashChain {
    pub difficulty: u8,
    pub blocks: Vec<Block>,
    pub state: BalanceState,
}

impl HashChain {
    /// Create a chain holding only the canonical genesis block. Genesis is
    /// fully deterministic (fixed timestamp, `"0"` previous-hash sentinel,
    /// a single zero-amount System credit), so every replica constructed
    /// with the same parameters starts byte-identical.
    pub fn new(difficulty: u8, genesis_timestamp: &str) -> Self {
        let mut chain = HashChain {
            difficulty,
            blocks: Vec::new(),
            state: BalanceState::new(),
        };
        let genesis = chain.create_genesis_block(genesis_timestamp);
        chain.blocks.push(genesis);
        chain
    }

    fn create_genesis_block(&self, timestamp: &str) -> Block {
        let mut genesis = Block::new(timestamp, GENESIS_PREV_HASH);
        genesis.transactions.push(Transaction::mint("Network", 0.0));
        genesis.finalize_transactions();
        mine(&mut genesis, self.difficulty);
        genesis
    }

    /// The chain is never empty after construction.
    pub fn latest(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds at least the genesis block")
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Build a block on the current tail, replay its transactions against
    /// the balance index, and mine it at this chain's own difficulty.
    /// This is the local append path used for joining-bonus blocks.
    pub fn append_block(&mut self, timestamp: &str, transactions: Vec<Transaction>) {
        let mut block = Block::new(timestamp, self.latest().hash.clone());
        for tx in transactions {
            self.state.apply_transaction(&tx);
            block.transactions.push(tx);
        }
        block.finalize_transactions();
        mine(&mut block, self.difficulty);
        self.blocks.push(block);
    }

    /// Consensus replication path: link the committed proposal to this
    /// replica's own tail, replay its transactions locally, and carry the
    /// winning `hash`, `nonce` and `tx_digest` over verbatim instead of
    /// re-mining.
    pub fn commit_replica(&mut self, proposal: &Block) {
        let mut block = Block::new(proposal.timestamp.clone(), self.latest().hash.clone());
        for tx in &proposal.transactions {
            self.state.apply_transaction(tx);
            block.transactions.push(tx.clone());
        }
        block.nonce = proposal.nonce;
        block.hash = proposal.hash.clone();
        block.tx_digest = proposal.tx_digest.clone();
        self.blocks.push(block);
    }

    /// Chain-wide integrity walk; see `validation` for the failure set.
    pub fn is_valid(&self) -> bool {
        validate_chain(self)
    }

    pub fn balance_of(&self, address: &str) -> f64 {
        self.state.balance_of(address)
    }

    /// State sync: replace the whole block sequence with a deep copy of
    /// `source` and rebuild the balance index by replaying every copied
    /// transaction. The cached index is never copied, and this replica's
    /// difficulty setting is kept.
    pub fn clone_from_source(&mut self, source: &HashChain) {
        self.blocks.clear();
        self.state.clear();

        for src in &source.blocks {
            let mut block = Block::new(src.timestamp.clone(), src.previous_hash.clone());
            for tx in &src.transactions {
                self.state.apply_transaction(tx);
                block.transactions.push(tx.clone());
            }
            block.nonce = src.nonce;
            block.hash = src.hash.clone();
            block.tx_digest = src.tx_digest.clone();
            self.blocks.push(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_chain() -> HashChain {
        HashChain::new(1, "01/01/2025")
    }

    #[test]
    fn genesis_invariant() {
        let chain = test_chain();
        assert_eq!(chain.block_count(), 1);
        assert_eq!(chain.blocks[0].previous_hash, GENESIS_PREV_HASH);
        assert!(chain.blocks[0].is_genesis());
        assert!(chain.is_valid());
    }

    #[test]
    fn identical_parameters_give_identical_genesis() {
        let a = HashChain::new(2, "01/01/2025");
        let b = HashChain::new(2, "01/01/2025");
        assert_eq!(a.blocks[0], b.blocks[0]);
    }

    #[test]
    fn append_links_and_preserves_validity() {
        let mut chain = test_chain();
        let genesis_hash = chain.latest().hash.clone();

        chain.append_block("Block_1", vec![Transaction::mint("@alice", 100.0)]);

        assert_eq!(chain.block_count(), 2);
        assert_eq!(chain.latest().previous_hash, genesis_hash);
        assert_eq!(chain.balance_of("@alice"), 100.0);
        assert!(chain.is_valid());
    }

    #[test]
    fn commit_replica_carries_proposal_digests_verbatim() {
        let mut proposer = test_chain();
        let mut follower = test_chain();

        let mut proposal = Block::new("Block_1", proposer.latest().hash.clone());
        proposal
            .transactions
            .push(Transaction::mint("@miner", 50.0));
        proposal.finalize_transactions();
        mine(&mut proposal, proposer.difficulty);

        proposer.commit_replica(&proposal);
        follower.commit_replica(&proposal);

        assert_eq!(proposer.latest().hash, proposal.hash);
        assert_eq!(follower.latest().nonce, proposal.nonce);
        assert_eq!(follower.latest().tx_digest, proposal.tx_digest);
        assert_eq!(follower.balance_of("@miner"), 50.0);
        assert!(proposer.is_valid());
        assert!(follower.is_valid());
    }

    #[test]
    fn clone_rebuilds_balances_by_replay() {
        let mut source = test_chain();
        source.append_block("Bonus", vec![Transaction::mint("@alice", 100.0)]);
        source.append_block("Block_1", vec![Transaction::new("@alice", "@bob", 40.0)]);

        let mut replica = HashChain::new(3, "01/01/2025");
        replica.clone_from_source(&source);

        assert_eq!(replica.block_count(), source.block_count());
        assert_eq!(replica.balance_of("@alice"), 60.0);
        assert_eq!(replica.balance_of("@bob"), 40.0);
        assert!(replica.is_valid());
        // The replica keeps its own difficulty setting.
        assert_eq!(replica.difficulty, 3);
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut source = test_chain();
        source.append_block("Bonus", vec![Transaction::mint("@alice", 100.0)]);

        let mut replica = test_chain();
        replica.clone_from_source(&source);
        source.blocks[1].nonce += 1;

        assert!(!source.is_valid());
        assert!(replica.is_valid());
    }
}
