use crate::blockchain::{Block, HashChain};
use crate::crypto::{meets_difficulty, Address};
use std::fmt;
use tracing::debug;

/// Why a voter turned a proposed block down. Reported per voter, never
/// globally; a single rejection only costs the proposal that node's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    Inactive,
    ReplicaInvalid,
    PreviousHashMismatch,
    HashMismatch,
    TxDigestMismatch,
    InsufficientWork,
}

impl fmt::Display for VoteRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            VoteRejection::Inactive => "node is inactive",
            VoteRejection::ReplicaInvalid => "own replica failed validation",
            VoteRejection::PreviousHashMismatch => "previous hash mismatch",
            VoteRejection::HashMismatch => "block hash mismatch",
            VoteRejection::TxDigestMismatch => "transaction digest mismatch",
            VoteRejection::InsufficientWork => "insufficient proof of work",
        };
        f.write_str(reason)
    }
}

/// One participant: an identity, an activity flag and an exclusively owned
/// replica of the ledger. Replicas never alias each other; they converge
/// only through successful consensus rounds.
#[derive(Debug, Clone)]
pub struct Node {
    pub address: Address,
    pub name: String,
    pub is_active: bool,
    pub chain: HashChain,
}

impl Node {
    pub fn new(address: impl Into<Address>, name: impl Into<String>, chain: HashChain) -> Self {
        Node {
            address: address.into(),
            name: name.into(),
            is_active: true,
            chain,
        }
    }

    /// Judge a proposed block against this node's own replica.
    ///
    /// The checks run in a fixed order: activity, local replica integrity (a
    /// node with a corrupted chain refuses to participate), linkage against
    /// the broadcast predecessor, both digests recomputed fresh, and finally
    /// the work threshold, measured against *this* replica's difficulty
    /// rather than the proposer's, so a stricter node can veto an honestly
    /// mined block.
    pub fn evaluate_block(&self, proposed: &Block, previous: &Block) -> Result<(), VoteRejection> {
        if !self.is_active {
            return Err(VoteRejection::Inactive);
        }
        if !self.chain.is_valid() {
            return Err(VoteRejection::ReplicaInvalid);
        }
        if proposed.previous_hash != previous.hash {
            return Err(VoteRejection::PreviousHashMismatch);
        }
        if proposed.hash != proposed.calculate_hash() {
            return Err(VoteRejection::HashMismatch);
        }
        if proposed.tx_digest != proposed.calculate_tx_digest() {
            return Err(VoteRejection::TxDigestMismatch);
        }
        if !meets_difficulty(&proposed.hash, self.chain.difficulty) {
            return Err(VoteRejection::InsufficientWork);
        }
        Ok(())
    }

    /// Read-only against this node's ledger.
    pub fn vote_on_block(&self, proposed: &Block, previous: &Block) -> bool {
        match self.evaluate_block(proposed, previous) {
            Ok(()) => {
                debug!(voter = %self.name, "vote: ACCEPT");
                true
            }
            Err(reason) => {
                debug!(voter = %self.name, %reason, "vote: REJECT");
                false
            }
        }
    }

    /// Membership voting is a stub policy: any active member approves any
    /// newcomer. The quorum mechanism is the point, not the policy.
    pub fn vote_on_node(&self, candidate: &Node) -> bool {
        if !self.is_active {
            return false;
        }
        debug!(voter = %self.name, candidate = %candidate.name, "vote: ACCEPT new node");
        true
    }

    /// This node's own balance, as its own replica sees it.
    pub fn balance(&self) -> f64 {
        self.chain.balance_of(&self.address)
    }
}
