//! Error types for QuorumChain
//!
//! Every variant is a recoverable outcome reported to the caller layer;
//! nothing here terminates the process.

use crate::crypto::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("no nodes in the network, quorum is impossible")]
    EmptyNetwork,

    #[error("miner {0} is missing or inactive")]
    InactiveOrMissingMiner(Address),

    #[error("insufficient balance for {address}: available ${available}, required ${required}")]
    InsufficientBalance {
        address: Address,
        available: f64,
        required: f64,
    },

    #[error("proposal rejected by network consensus")]
    ConsensusRejected,

    #[error("no registered node with address {0}")]
    UnknownNode(Address),

    #[error("block index {index} out of tamperable range (1..{blocks})")]
    InvalidIndex { index: usize, blocks: usize },

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
