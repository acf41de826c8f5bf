use crate::transaction::Transaction;

/// FIFO buffer of pending transfers, shared by the whole simulated network.
///
/// No validation happens here: balance sufficiency is the submitter's
/// concern, checked once against the sender's balance at submission time.
/// The pool is cleared in full only after a mining round commits; a
/// rejected proposal leaves it intact for retry.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    pending: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Read the queue without removing anything; proposals clone from here.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submissions_keep_fifo_order() {
        let mut pool = Mempool::new();
        pool.submit(Transaction::new("@alice", "@bob", 10.0));
        pool.submit(Transaction::new("@bob", "@carol", 5.0));

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.pending()[0].from, "@alice");
        assert_eq!(pool.pending()[1].from, "@bob");
    }

    #[test]
    fn reading_does_not_drain() {
        let mut pool = Mempool::new();
        pool.submit(Transaction::new("@alice", "@bob", 10.0));

        let _ = pool.pending();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn clear_empties_the_pool() {
        let mut pool = Mempool::new();
        pool.submit(Transaction::new("@alice", "@bob", 10.0));
        pool.clear();

        assert!(pool.is_empty());
    }
}
