//! Transaction selection strategies for block production
//!
//! A strategy takes a snapshot of the mempool grouped by sender and returns
//! at most `how_many` transactions in the order they should go into a block.
//! Every strategy must keep each sender's transactions in nonce order and
//! must be deterministic: senders are always visited in account order so
//! that the iteration order of the snapshot never leaks into the result.

pub mod tip;
pub mod tip_advanced;

use crate::account::AccountId;
use crate::error::ChainError;
use crate::transaction::BlockTx;
use std::collections::HashMap;

pub const STRATEGY_TIP: &str = "tip";
pub const STRATEGY_TIP_ADVANCED: &str = "tip_advanced";

/// Selects up to `how_many` transactions from a mempool snapshot grouped by
/// sender.
pub type SelectFn = fn(&HashMap<AccountId, Vec<BlockTx>>, usize) -> Vec<BlockTx>;

/// Named selection strategies. Built once at startup and handed to whatever
/// needs to resolve a strategy name.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, SelectFn>,
}

impl StrategyRegistry {
    /// A registry holding the built-in strategies.
    pub fn new() -> Self {
        Self::empty()
            .register(STRATEGY_TIP, tip::select)
            .register(STRATEGY_TIP_ADVANCED, tip_advanced::select)
    }

    pub fn empty() -> Self {
        StrategyRegistry {
            strategies: HashMap::new(),
        }
    }

    /// Adds or replaces a strategy. Names are case-insensitive.
    pub fn register(mut self, name: &str, select: SelectFn) -> Self {
        self.strategies.insert(name.to_lowercase(), select);
        self
    }

    /// Looks up a strategy by name, ignoring case.
    pub fn retrieve(&self, name: &str) -> Result<SelectFn, ChainError> {
        self.strategies
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| ChainError::UnknownStrategy(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies each sender's transactions sorted by nonce, senders in account
/// order. The caller's snapshot is left untouched.
fn nonce_ordered(mempool: &HashMap<AccountId, Vec<BlockTx>>) -> Vec<Vec<BlockTx>> {
    let mut senders: Vec<&AccountId> = mempool.keys().collect();
    senders.sort();

    senders
        .into_iter()
        .filter_map(|sender| {
            let mut txs = mempool.get(sender)?.clone();
            txs.sort_by_key(BlockTx::nonce);
            (!txs.is_empty()).then_some(txs)
        })
        .collect()
}

/// Emits the groups row by row: row `i` holds the `i`-th transaction of every
/// sender that has one, ordered by descending tip. A sender contributes at
/// most one transaction per row, so nonce order within a sender survives any
/// tip ordering across senders.
fn take_by_rows(groups: Vec<Vec<BlockTx>>, how_many: usize) -> Vec<BlockTx> {
    let total: usize = groups.iter().map(Vec::len).sum();
    let mut selected = Vec::with_capacity(how_many.min(total));
    let mut queues: Vec<std::vec::IntoIter<BlockTx>> =
        groups.into_iter().map(Vec::into_iter).collect();

    while selected.len() < how_many {
        let mut row: Vec<BlockTx> = queues.iter_mut().filter_map(|queue| queue.next()).collect();
        if row.is_empty() {
            break;
        }

        // Stable, so equal tips keep account order.
        row.sort_by(|a, b| b.tip().cmp(&a.tip()));

        let need = how_many - selected.len();
        selected.extend(row.into_iter().take(need));
    }

    selected
}
