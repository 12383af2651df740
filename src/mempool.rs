//! Pending transaction pool
//!
//! Transactions are keyed by `from:nonce`, so a sender has at most one
//! pending transaction per nonce. Picking transactions for a block is
//! delegated to the configured selection strategy.

use crate::account::AccountId;
use crate::error::ChainError;
use crate::selector::{SelectFn, StrategyRegistry};
use crate::transaction::BlockTx;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

pub struct Mempool {
    pool: RwLock<HashMap<String, BlockTx>>,
    strategy: String,
    select_fn: SelectFn,
}

impl Mempool {
    /// Creates an empty pool that orders transactions with the named
    /// strategy.
    pub fn new(registry: &StrategyRegistry, strategy: &str) -> Result<Self, ChainError> {
        let select_fn = registry.retrieve(strategy)?;

        Ok(Mempool {
            pool: RwLock::new(HashMap::new()),
            strategy: strategy.to_lowercase(),
            select_fn,
        })
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn count(&self) -> usize {
        self.pool.read().len()
    }

    /// Adds a transaction or replaces the pending one with the same nonce.
    ///
    /// A replacement must raise the tip by at least 10% so a sender cannot
    /// churn the pool with free resubmissions.
    pub fn upsert(&self, tx: BlockTx) -> Result<(), ChainError> {
        let key = pool_key(&tx);
        let mut pool = self.pool.write();

        if let Some(existing) = pool.get(&key) {
            let required = bumped_tip(existing.tip());
            if tx.tip() < required {
                return Err(ChainError::TipBumpTooLow {
                    existing: existing.tip(),
                    offered: tx.tip(),
                });
            }
            debug!(tx = %key, old_tip = existing.tip(), new_tip = tx.tip(), "replacing pending transaction");
        }

        pool.insert(key, tx);
        Ok(())
    }

    /// Removes the transaction if it is pending.
    pub fn delete(&self, tx: &BlockTx) {
        self.pool.write().remove(&pool_key(tx));
    }

    /// Drops every pending transaction.
    pub fn truncate(&self) {
        self.pool.write().clear();
    }

    /// Returns up to `how_many` transactions in strategy order.
    pub fn pick_best(&self, how_many: usize) -> Vec<BlockTx> {
        let grouped = self.grouped();
        (self.select_fn)(&grouped, how_many)
    }

    /// Returns every pending transaction in strategy order.
    pub fn pick_all(&self) -> Vec<BlockTx> {
        let grouped = self.grouped();
        let total = grouped.values().map(Vec::len).sum();
        (self.select_fn)(&grouped, total)
    }

    /// Snapshot of the pool grouped by sender, taken under the read lock.
    fn grouped(&self) -> HashMap<AccountId, Vec<BlockTx>> {
        let pool = self.pool.read();
        let mut grouped: HashMap<AccountId, Vec<BlockTx>> = HashMap::new();
        for tx in pool.values() {
            grouped.entry(tx.from().clone()).or_default().push(tx.clone());
        }
        grouped
    }
}

/// `from:nonce`, with the sender lowercased so spellings of one account
/// share a slot.
fn pool_key(tx: &BlockTx) -> String {
    format!("{}:{}", tx.from().canonical(), tx.nonce())
}

/// Smallest tip that may replace a pending transaction tipping `tip`.
fn bumped_tip(tip: u64) -> u64 {
    tip.saturating_add(tip.saturating_add(5) / 10)
}
