//! Voting protocols that keep every replica synchronized: block admission,
//! node admission, and the mining orchestration that feeds the former.

use crate::blockchain::Block;
use crate::config::SimulationConfig;
use crate::error::{ChainError, Result};
use crate::mempool::Mempool;
use crate::miner::mine;
use crate::node::Node;
use crate::registry::Registry;
use crate::transaction::Transaction;
use tracing::info;

/// Timestamp label on the bootstrap bonus block of the very first node.
pub const BOOTSTRAP_BONUS_LABEL: &str = "Joining Bonus";
/// Timestamp label on the bonus blocks replicated at every later admission.
pub const ADMISSION_BONUS_LABEL: &str = "User Joining";

/// Outcome of one voting round over the active membership. Inactive nodes
/// are excluded from both counts; they are not abstentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub active: usize,
    pub votes_for: usize,
}

impl VoteTally {
    fn count<F>(registry: &Registry, mut ballot: F) -> Self
    where
        F: FnMut(&Node) -> bool,
    {
        let mut tally = VoteTally {
            active: 0,
            votes_for: 0,
        };
        for node in registry.iter() {
            if node.is_active {
                tally.active += 1;
                if ballot(node) {
                    tally.votes_for += 1;
                }
            }
        }
        tally
    }

    /// Strict majority of active members; integer division, so with an even
    /// active count exactly half is insufficient.
    pub fn passes(&self) -> bool {
        self.votes_for > self.active / 2
    }

    pub fn votes_against(&self) -> usize {
        self.active - self.votes_for
    }
}

/// The consensus engine reads the registry and the mempool and mutates
/// every replica atomically with respect to the round's outcome: either all
/// chains gain the block and the pool is cleared, or nothing changes.
pub struct ConsensusEngine;

impl ConsensusEngine {
    /// Block admission: broadcast the proposal and its predecessor to every
    /// member, tally active votes, and on a strict majority replicate the
    /// identical block into every registered chain.
    pub fn admit_block(
        registry: &mut Registry,
        mempool: &mut Mempool,
        proposed: &Block,
        previous: &Block,
    ) -> Result<VoteTally> {
        if registry.is_empty() {
            return Err(ChainError::EmptyNetwork);
        }

        info!(members = registry.len(), "broadcasting block proposal");
        let tally = VoteTally::count(registry, |node| node.vote_on_block(proposed, previous));
        info!(
            active = tally.active,
            votes_for = tally.votes_for,
            votes_against = tally.votes_against(),
            "block vote tallied"
        );

        if !tally.passes() {
            info!("consensus failed: block rejected");
            return Err(ChainError::ConsensusRejected);
        }

        // Replication is unconditional once consensus is reached; inactive
        // replicas receive the committed block too. Clearing the pool
        // belongs to the same unit of work.
        for node in registry.iter_mut() {
            node.chain.commit_replica(proposed);
        }
        mempool.clear();
        info!(hash = %proposed.hash, "consensus reached: block committed");
        Ok(tally)
    }

    /// Mining orchestration: assemble a proposal for `miner_address` (the
    /// reward credit first, then a clone of every pending transfer), mine
    /// it at the proposer's own difficulty, and put it to the vote. On
    /// rejection the reward is discarded with the proposal and the pool is
    /// left queued.
    pub fn mine_and_propose(
        registry: &mut Registry,
        mempool: &mut Mempool,
        miner_address: &str,
        timestamp: &str,
        config: &SimulationConfig,
    ) -> Result<VoteTally> {
        let (miner_name, difficulty, previous) = match registry.get_by_address(miner_address) {
            Some(miner) if miner.is_active => (
                miner.name.clone(),
                miner.chain.difficulty,
                miner.chain.latest().clone(),
            ),
            _ => return Err(ChainError::InactiveOrMissingMiner(miner_address.to_string())),
        };

        let mut proposed = Block::new(timestamp, previous.hash.clone());
        proposed
            .transactions
            .push(Transaction::mint(miner_address, config.mining_reward));
        proposed
            .transactions
            .extend(mempool.pending().iter().cloned());
        proposed.finalize_transactions();

        info!(miner = %miner_name, pending = mempool.len(), difficulty, "mining proposed block");
        mine(&mut proposed, difficulty);

        let tally = Self::admit_block(registry, mempool, &proposed, &previous)?;
        info!(miner = %miner_name, reward = config.mining_reward, "mining reward paid");
        Ok(tally)
    }

    /// Node admission. An empty registry bootstraps: the very first node
    /// cannot be voted on by anyone, so it is auto-accepted and credited
    /// its joining bonus on its own chain only. Every later candidate faces
    /// the same active-majority rule as blocks; on success it is synced
    /// from the first registered replica and the bonus block is appended to
    /// every chain, candidate included, so all replicas stay
    /// balance-consistent.
    pub fn admit_node(
        registry: &mut Registry,
        mut candidate: Node,
        config: &SimulationConfig,
    ) -> Result<()> {
        if registry.is_empty() {
            info!(node = %candidate.name, "first node joining, auto-accepted");
            candidate.chain.append_block(
                BOOTSTRAP_BONUS_LABEL,
                vec![Transaction::mint(&candidate.address, config.joining_bonus)],
            );
            registry.add(candidate);
            return Ok(());
        }

        info!(candidate = %candidate.name, members = registry.len(), "broadcasting membership request");
        let tally = VoteTally::count(registry, |node| node.vote_on_node(&candidate));
        info!(
            candidate = %candidate.name,
            active = tally.active,
            votes_for = tally.votes_for,
            votes_against = tally.votes_against(),
            "membership vote tallied"
        );

        if !tally.passes() {
            info!(candidate = %candidate.name, "consensus failed: node rejected");
            return Err(ChainError::ConsensusRejected);
        }

        if let Some(first) = registry.first() {
            candidate.chain.clone_from_source(&first.chain);
        }

        let bonus = Transaction::mint(&candidate.address, config.joining_bonus);
        info!(node = %candidate.name, bonus = config.joining_bonus, "node admitted, crediting joining bonus");
        registry.add(candidate);
        for node in registry.iter_mut() {
            node.chain.append_block(ADMISSION_BONUS_LABEL, vec![bonus.clone()]);
        }
        Ok(())
    }
}
