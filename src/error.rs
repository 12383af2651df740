//! Error types for blockledger

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Invalid chain id, got[{got}] exp[{expected}]")]
    ChainMismatch { got: u16, expected: u16 },

    #[error("Transaction invalid, sending money to yourself, from {from}, to {to}")]
    SelfPayment { from: String, to: String },

    #[error("Bad signature: {0}")]
    BadSignature(String),

    #[error("Signature address doesn't match from address")]
    SignerMismatch,

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("Strategy {0:?} does not exist")]
    UnknownStrategy(String),

    #[error("Block {0} not found")]
    NotFound(u64),

    #[error("End of chain")]
    EndOfChain,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Replacing a transaction requires a 10% bump in the tip, existing {existing}, offered {offered}")]
    TipBumpTooLow { existing: u64, offered: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
