//! Maximum total tip for a block of a given size.

use super::{nonce_ordered, take_by_rows};
use crate::account::AccountId;
use crate::transaction::BlockTx;
use std::collections::HashMap;

/// Picks the `how_many` transactions with the largest combined tip that can
/// be included without skipping a nonce, i.e. a leading run of each sender's
/// transactions. A cheap transaction that unlocks an expensive follow-up can
/// therefore win over a moderately tipped one from another sender.
///
/// The chosen runs are emitted in the same row order as the `tip` strategy.
pub fn select(mempool: &HashMap<AccountId, Vec<BlockTx>>, how_many: usize) -> Vec<BlockTx> {
    if how_many == 0 {
        return Vec::new();
    }

    let mut groups = nonce_ordered(mempool);
    let total: usize = groups.iter().map(Vec::len).sum();
    let target = how_many.min(total);

    let takes = best_takes(&groups, target);
    for (group, take) in groups.iter_mut().zip(takes) {
        group.truncate(take);
    }

    take_by_rows(groups, target)
}

/// Returns, per group, how many leading transactions to take so that exactly
/// `target` are taken and their tips sum to the maximum.
///
/// `best[i][j]` is the best tip sum using the first `i` groups and taking `j`
/// transactions. Ties keep the smaller take for the later group, leaving more
/// room for senders earlier in account order.
fn best_takes(groups: &[Vec<BlockTx>], target: usize) -> Vec<usize> {
    let mut best: Vec<Vec<Option<u128>>> = vec![vec![None; target + 1]; groups.len() + 1];
    let mut choice: Vec<Vec<usize>> = vec![vec![0; target + 1]; groups.len() + 1];
    best[0][0] = Some(0);

    for (i, group) in groups.iter().enumerate() {
        let mut prefix = Vec::with_capacity(group.len() + 1);
        prefix.push(0u128);
        for tx in group {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + tx.tip() as u128);
        }

        for j in 0..=target {
            for (take, sum) in prefix.iter().enumerate().take(j + 1) {
                let Some(previous) = best[i][j - take] else {
                    continue;
                };
                let candidate = previous + sum;
                if best[i + 1][j].map_or(true, |current| candidate > current) {
                    best[i + 1][j] = Some(candidate);
                    choice[i + 1][j] = take;
                }
            }
        }
    }

    let mut takes = vec![0; groups.len()];
    let mut remaining = target;
    for i in (0..groups.len()).rev() {
        let take = choice[i + 1][remaining];
        takes[i] = take;
        remaining -= take;
    }
    takes
}
