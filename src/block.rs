//! Blocks as they are persisted: a header plus the ordered transactions

use crate::account::AccountId;
use crate::transaction::BlockTx;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hash of the parent of block 1.
pub const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub prev_block_hash: String,
    pub timestamp: u64,
    pub beneficiary: AccountId,
    pub difficulty: u16,
    pub mining_reward: u64,
    pub state_root: String,
    pub trans_root: String,
    pub nonce: u64,
}

impl BlockHeader {
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_le_bytes());
        update_str(&mut hasher, &self.prev_block_hash);
        hasher.update(self.timestamp.to_le_bytes());
        update_str(&mut hasher, self.beneficiary.as_str());
        hasher.update(self.difficulty.to_le_bytes());
        hasher.update(self.mining_reward.to_le_bytes());
        update_str(&mut hasher, &self.state_root);
        update_str(&mut hasher, &self.trans_root);
        hasher.update(self.nonce.to_le_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

/// Feeds a length-prefixed string so adjacent fields cannot trade bytes.
pub(crate) fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// The unit of persistence: one numbered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub hash: String,
    pub header: BlockHeader,
    pub trans: Vec<BlockTx>,
}

impl BlockData {
    /// Seals a block: fills in the transaction root and the block hash.
    pub fn new(mut header: BlockHeader, trans: Vec<BlockTx>) -> Self {
        header.trans_root = Self::calculate_trans_root(&trans);
        BlockData {
            hash: header.hash(),
            header,
            trans,
        }
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    pub fn calculate_trans_root(trans: &[BlockTx]) -> String {
        let mut hasher = Sha256::new();
        for tx in trans {
            hasher.update(tx.hash());
        }
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}
