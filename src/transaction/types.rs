/// Transaction types for blockledger
use crate::account::AccountId;
use crate::block::update_str;
use crate::crypto::{self, KeyPair};
use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// An unsigned transfer of value between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub chain_id: u16,
    pub nonce: u64,
    pub from: AccountId,
    pub to: AccountId,
    pub value: u64,
    pub tip: u64,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Tx {
    /// Constructs a new transaction. Both accounts must be well formed;
    /// paying yourself is only rejected at validation time.
    pub fn new(
        chain_id: u16,
        nonce: u64,
        from: AccountId,
        to: AccountId,
        value: u64,
        tip: u64,
        data: Vec<u8>,
    ) -> Result<Self, ChainError> {
        if !from.is_account_id() {
            return Err(ChainError::InvalidAccount(
                "from account is not properly formatted".to_string(),
            ));
        }
        if !to.is_account_id() {
            return Err(ChainError::InvalidAccount(
                "to account is not properly formatted".to_string(),
            ));
        }

        Ok(Tx {
            chain_id,
            nonce,
            from,
            to,
            value,
            tip,
            data,
        })
    }

    pub fn sign(&self, keypair: &KeyPair) -> Result<SignedTx, ChainError> {
        let (v, r, s) = crypto::sign(self, keypair)?;

        Ok(SignedTx {
            tx: self.clone(),
            v,
            r,
            s,
        })
    }
}

/// A transaction together with the signature of its sender. This is how
/// wallets hand transactions to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
    #[serde(flatten)]
    pub tx: Tx,
    /// Recovery id offset by [`crypto::RECOVERY_ID_OFFSET`].
    pub v: u64,
    #[serde(with = "hex32")]
    pub r: [u8; 32],
    #[serde(with = "hex32")]
    pub s: [u8; 32],
}

impl SignedTx {
    pub fn signature_string(&self) -> String {
        crypto::signature_string(self.v, &self.r, &self.s)
    }
}

/// Identity of the transaction within its sender's pending set.
impl fmt::Display for SignedTx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.tx.from, self.tx.nonce)
    }
}

/// A signed transaction as it is carried inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTx {
    #[serde(flatten)]
    pub signed_tx: SignedTx,
    /// Milliseconds since the epoch when the node accepted the transaction.
    pub timestamp: u64,
    pub gas_price: u64,
    pub gas_units: u64,
}

impl BlockTx {
    pub fn new(signed_tx: SignedTx, gas_price: u64, gas_units: u64) -> Self {
        BlockTx {
            signed_tx,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            gas_price,
            gas_units,
        }
    }

    pub fn from(&self) -> &AccountId {
        &self.signed_tx.tx.from
    }

    pub fn nonce(&self) -> u64 {
        self.signed_tx.tx.nonce
    }

    pub fn tip(&self) -> u64 {
        self.signed_tx.tx.tip
    }

    /// Calculate the hash of this transaction
    pub fn hash(&self) -> [u8; 32] {
        let tx = &self.signed_tx.tx;
        let mut hasher = Sha256::new();
        hasher.update(tx.chain_id.to_le_bytes());
        hasher.update(tx.nonce.to_le_bytes());
        update_str(&mut hasher, tx.from.as_str());
        update_str(&mut hasher, tx.to.as_str());
        hasher.update(tx.value.to_le_bytes());
        hasher.update(tx.tip.to_le_bytes());
        hasher.update((tx.data.len() as u64).to_le_bytes());
        hasher.update(&tx.data);
        hasher.update(self.signed_tx.v.to_le_bytes());
        hasher.update(self.signed_tx.r);
        hasher.update(self.signed_tx.s);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.gas_price.to_le_bytes());
        hasher.update(self.gas_units.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}

impl fmt::Display for BlockTx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.signed_tx, f)
    }
}

/// Byte payloads travel as base64 strings.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Signature coordinates travel as 0x-prefixed hex.
mod hex32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let digits = encoded.strip_prefix("0x").unwrap_or(&encoded);
        let bytes = hex::decode(digits).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|b: Vec<u8>| {
            serde::de::Error::custom(format!("expected 32 bytes, got {}", b.len()))
        })
    }
}
