//! blockledger - transaction model, block selection and block storage for a
//! blockchain node
//!
//! # Architecture
//!
//! ## Transactions
//! - [`account`] - Account identifiers
//! - [`transaction`] - Transaction types, signing and validation
//! - [`crypto`] - Recoverable secp256k1 signatures
//!
//! ## Block Production
//! - [`mempool`] - Pending transaction pool
//! - [`selector`] - Named transaction selection strategies
//! - [`block`] - Block header and body
//!
//! ## Persistence
//! - [`storage`] - File-per-block storage and chain replay
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Transactions
// ============================================================================
pub mod account;
pub mod crypto;
pub mod transaction;

// ============================================================================
// Block Production
// ============================================================================
pub mod block;
pub mod mempool;
pub mod selector;

// ============================================================================
// Persistence
// ============================================================================
pub mod storage;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use account::AccountId;
pub use block::{BlockData, BlockHeader};
pub use error::{ChainError, Result};
pub use transaction::{BlockTx, SignedTx, Tx};
