use crate::crypto::Address;
use crate::transaction::Transaction;
use std::collections::HashMap;

/// Derived balance index over every transaction committed to a chain.
/// Always rebuilt by replay, never copied from another replica's cache.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BalanceState {
    pub balances: HashMap<Address, f64>,
}

impl BalanceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the recipient and debit the sender, unless the sender is the
    /// reserved `System` address (minted value carries no debit).
    pub fn apply_transaction(&mut self, tx: &Transaction) {
        if !tx.is_mint() {
            *self.balances.entry(tx.from.clone()).or_insert(0.0) -= tx.amount;
        }
        *self.balances.entry(tx.to.clone()).or_insert(0.0) += tx.amount;
    }

    /// Unknown addresses read as zero, never as an error.
    pub fn balance_of(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        self.balances.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_debits_sender_and_credits_recipient() {
        let mut state = BalanceState::new();
        state.apply_transaction(&Transaction::mint("@alice", 100.0));
        state.apply_transaction(&Transaction::new("@alice", "@bob", 30.0));

        assert_eq!(state.balance_of("@alice"), 70.0);
        assert_eq!(state.balance_of("@bob"), 30.0);
    }

    #[test]
    fn mint_carries_no_debit() {
        let mut state = BalanceState::new();
        state.apply_transaction(&Transaction::mint("@alice", 50.0));

        assert_eq!(state.balance_of("@alice"), 50.0);
        assert_eq!(state.balance_of("System"), 0.0);
    }

    #[test]
    fn unknown_address_reads_as_zero() {
        let state = BalanceState::new();
        assert_eq!(state.balance_of("@nobody"), 0.0);
    }

    #[test]
    fn clear_resets_the_index() {
        let mut state = BalanceState::new();
        state.apply_transaction(&Transaction::mint("@alice", 100.0));
        state.clear();
        assert_eq!(state.balance_of("@alice"), 0.0);
    }
}
