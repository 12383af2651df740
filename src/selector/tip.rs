//! Highest tip first, row by row.

use super::{nonce_ordered, take_by_rows};
use crate::account::AccountId;
use crate::transaction::BlockTx;
use std::collections::HashMap;

/// Orders transactions by descending tip while respecting each sender's
/// nonce order: the next pending transaction of every sender competes on tip
/// before any sender's following transaction is considered.
pub fn select(mempool: &HashMap<AccountId, Vec<BlockTx>>, how_many: usize) -> Vec<BlockTx> {
    if how_many == 0 {
        return Vec::new();
    }

    take_by_rows(nonce_ordered(mempool), how_many)
}
