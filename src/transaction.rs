use crate::crypto::{Address, SYSTEM_ADDRESS};
use std::fmt;

/// A value transfer between two addresses. Immutable once included in a
/// mined block; mempool copies are free-standing until cloned into one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub amount: f64,
}

impl Transaction {
    pub fn new(from: impl Into<Address>, to: impl Into<Address>, amount: f64) -> Self {
        Transaction {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// A minting transaction from the reserved `System` sender (mining
    /// rewards, joining bonuses, the genesis credit).
    pub fn mint(to: impl Into<Address>, amount: f64) -> Self {
        Transaction::new(SYSTEM_ADDRESS, to, amount)
    }

    /// Minted transfers credit the recipient without debiting anyone.
    pub fn is_mint(&self) -> bool {
        self.from == SYSTEM_ADDRESS
    }

    /// Canonical encoding fed into the per-block transaction digest.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.from, self.to, self.amount)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "From: {} -> To: {} | Amount: ${}",
            self.from, self.to, self.amount
        )
    }
}
