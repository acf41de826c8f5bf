//! The simulated network: a single engine object owning the node registry,
//! the shared transaction pool and the protocol parameters. Everything the
//! caller layer can do goes through here; there are no process-wide
//! globals.

use crate::blockchain::{HashChain, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::config::{load_config, SimulationConfig};
use crate::consensus::ConsensusEngine;
use crate::crypto::Address;
use crate::error::{ChainError, Result};
use crate::mempool::Mempool;
use crate::node::Node;
use crate::registry::Registry;
use crate::transaction::Transaction;
use tracing::{info, warn};

/// Caller-selectable field for the tampering demo hook.
#[derive(Debug, Clone, PartialEq)]
pub enum TamperField {
    Timestamp(String),
    /// Rewrites the amount of the block's first transaction.
    Amount(f64),
    Nonce(u32),
}

/// Listing row describing one registered node.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NodeSummary {
    pub address: Address,
    pub name: String,
    pub is_active: bool,
    pub balance: f64,
    pub block_count: usize,
}

/// A committed transaction with the block coordinates it settled in,
/// as seen by one replica.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConfirmedTransaction {
    pub block_index: usize,
    pub timestamp: String,
    pub transaction: Transaction,
}

pub struct Network {
    registry: Registry,
    mempool: Mempool,
    config: SimulationConfig,
}

impl Network {
    pub fn new(config: SimulationConfig) -> Self {
        Network {
            registry: Registry::new(),
            mempool: Mempool::new(),
            config,
        }
    }

    /// Load the config file (defaults when absent), install the fmt tracing
    /// subscriber, and build the engine. Intended for the caller binary;
    /// tests construct with [`Network::new`] directly.
    pub fn init() -> Result<Self> {
        let config = load_config()?;
        let _ = tracing_subscriber::fmt::try_init();
        info!(
            difficulty = config.difficulty,
            mining_reward = config.mining_reward,
            joining_bonus = config.joining_bonus,
            "starting quorumchain network"
        );
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Put a fresh candidate through the node-admission protocol.
    pub fn admit_node(&mut self, address: &str, name: &str) -> Result<()> {
        let chain = HashChain::new(self.config.difficulty, &self.config.genesis_timestamp);
        let candidate = Node::new(address, name, chain);
        ConsensusEngine::admit_node(&mut self.registry, candidate, &self.config)
    }

    /// Queue a transfer. The sender's balance is checked once, here,
    /// against the sender's own replica at this instant; nothing
    /// re-validates at mining time, so several queued transfers can
    /// jointly overdraw. An unregistered sender reads as balance zero.
    pub fn submit_transaction(&mut self, from: &str, to: &str, amount: f64) -> Result<()> {
        let available = self
            .registry
            .get_by_address(from)
            .map(|node| node.chain.balance_of(from))
            .unwrap_or(0.0);
        if available < amount {
            return Err(ChainError::InsufficientBalance {
                address: from.to_string(),
                available,
                required: amount,
            });
        }

        self.mempool.submit(Transaction::new(from, to, amount));
        info!(from, to, amount, pending = self.mempool.len(), "transaction queued");
        Ok(())
    }

    /// Mine a block on behalf of `miner_address` and put it to the vote.
    pub fn mine_block(&mut self, miner_address: &str, timestamp: &str) -> Result<()> {
        ConsensusEngine::mine_and_propose(
            &mut self.registry,
            &mut self.mempool,
            miner_address,
            timestamp,
            &self.config,
        )
        .map(|_| ())
    }

    /// Convenience wrapper stamping the current UTC time.
    pub fn mine_block_now(&mut self, miner_address: &str) -> Result<()> {
        let timestamp = chrono::Utc::now().format("%d/%m/%Y %H:%M:%S").to_string();
        self.mine_block(miner_address, &timestamp)
    }

    /// Flip a node between active and inactive; returns the new state.
    /// Inactive nodes drop out of every quorum but their ledgers stay
    /// readable and still receive committed blocks.
    pub fn toggle_active(&mut self, address: &str) -> Result<bool> {
        let node = self
            .registry
            .get_by_address_mut(address)
            .ok_or_else(|| ChainError::UnknownNode(address.to_string()))?;
        node.is_active = !node.is_active;
        info!(node = %node.name, active = node.is_active, "node status toggled");
        Ok(node.is_active)
    }

    /// Balance of `queried` as `node_address`'s replica sees it. Unknown
    /// queried addresses read as zero.
    pub fn get_balance(&self, node_address: &str, queried: &str) -> Result<f64> {
        let node = self
            .registry
            .get_by_address(node_address)
            .ok_or_else(|| ChainError::UnknownNode(node_address.to_string()))?;
        Ok(node.chain.balance_of(queried))
    }

    /// Set one replica's proof-of-work threshold. Voters judge proposals
    /// against their own threshold, so a stricter node can veto blocks the
    /// rest of the network would accept.
    pub fn set_difficulty(&mut self, node_address: &str, difficulty: u8) -> Result<()> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(ChainError::InvalidDifficulty(difficulty));
        }
        let node = self
            .registry
            .get_by_address_mut(node_address)
            .ok_or_else(|| ChainError::UnknownNode(node_address.to_string()))?;
        node.chain.difficulty = difficulty;
        info!(node = %node.name, difficulty, "difficulty updated");
        Ok(())
    }

    pub fn validate_chain(&self, node_address: &str) -> Result<bool> {
        let node = self
            .registry
            .get_by_address(node_address)
            .ok_or_else(|| ChainError::UnknownNode(node_address.to_string()))?;
        Ok(node.chain.is_valid())
    }

    /// Demo hook: mutate one committed block in place without recomputing
    /// its digests, so `validate_chain` can be observed failing. Genesis is
    /// off limits, as are indices past the tail. No repair is attempted.
    pub fn tamper_block(
        &mut self,
        node_address: &str,
        block_index: usize,
        field: TamperField,
    ) -> Result<()> {
        let node = self
            .registry
            .get_by_address_mut(node_address)
            .ok_or_else(|| ChainError::UnknownNode(node_address.to_string()))?;

        let blocks = node.chain.block_count();
        if block_index == 0 || block_index >= blocks {
            return Err(ChainError::InvalidIndex {
                index: block_index,
                blocks,
            });
        }

        let block = &mut node.chain.blocks[block_index];
        match field {
            TamperField::Timestamp(timestamp) => block.timestamp = timestamp,
            TamperField::Amount(amount) => {
                if let Some(tx) = block.transactions.first_mut() {
                    tx.amount = amount;
                }
            }
            TamperField::Nonce(nonce) => block.nonce = nonce,
        }

        warn!(node = %node.name, block_index, "block tampered; this replica will now fail validation");
        Ok(())
    }

    pub fn list_nodes(&self) -> Vec<NodeSummary> {
        self.registry
            .iter()
            .map(|node| NodeSummary {
                address: node.address.clone(),
                name: node.name.clone(),
                is_active: node.is_active,
                balance: node.balance(),
                block_count: node.chain.block_count(),
            })
            .collect()
    }

    pub fn list_pending_transactions(&self) -> &[Transaction] {
        self.mempool.pending()
    }

    /// Every committed transaction in `node_address`'s replica, in chain
    /// order, with the block it settled in.
    pub fn list_confirmed_transactions(
        &self,
        node_address: &str,
    ) -> Result<Vec<ConfirmedTransaction>> {
        let node = self
            .registry
            .get_by_address(node_address)
            .ok_or_else(|| ChainError::UnknownNode(node_address.to_string()))?;

        let mut confirmed = Vec::new();
        for (block_index, block) in node.chain.blocks.iter().enumerate() {
            for tx in &block.transactions {
                confirmed.push(ConfirmedTransaction {
                    block_index,
                    timestamp: block.timestamp.clone(),
                    transaction: tx.clone(),
                });
            }
        }
        Ok(confirmed)
    }
}
