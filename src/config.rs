//! Configuration management for QuorumChain

use crate::blockchain::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default config file consulted by [`load_config`].
pub const CONFIG_FILE: &str = "quorumchain.toml";

/// Protocol parameters for one simulated network. Every field has a
/// default, so a partial (or absent) config file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Leading zero hex digits required of a block digest (1..=5).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Reward credited to the proposing miner on a committed round.
    #[serde(default = "default_mining_reward")]
    pub mining_reward: f64,
    /// One-time credit for every admitted node.
    #[serde(default = "default_joining_bonus")]
    pub joining_bonus: f64,
    /// Fixed timestamp of the canonical genesis block. All replicas must
    /// share it or their chains diverge from the start.
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            difficulty: default_difficulty(),
            mining_reward: default_mining_reward(),
            joining_bonus: default_joining_bonus(),
            genesis_timestamp: default_genesis_timestamp(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ChainError::InvalidDifficulty(self.difficulty));
        }
        if self.mining_reward < 0.0 || self.joining_bonus < 0.0 {
            return Err(ChainError::Config(
                "reward amounts must not be negative".to_string(),
            ));
        }
        if self.genesis_timestamp.is_empty() {
            return Err(ChainError::Config(
                "genesis_timestamp must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_difficulty() -> u8 {
    2
}

fn default_mining_reward() -> f64 {
    50.0
}

fn default_joining_bonus() -> f64 {
    100.0
}

fn default_genesis_timestamp() -> String {
    "01/01/2025".to_string()
}

/// Load `quorumchain.toml` from the working directory, falling back to
/// defaults when the file is absent.
pub fn load_config() -> Result<SimulationConfig> {
    load_config_from(CONFIG_FILE)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<SimulationConfig> {
    let raw = fs::read_to_string(path).unwrap_or_default();
    let config: SimulationConfig = if raw.is_empty() {
        SimulationConfig::default()
    } else {
        toml::from_str(&raw).map_err(|e| ChainError::Config(e.to_string()))?
    };

    config.validate()?;
    Ok(config)
}
