//! Block storage backends and chain replay
//!
//! Blocks are stored as individually numbered records. Replaying the chain
//! reads block 1, 2, 3, ... until a number has no record; that first gap is
//! the end of the chain.

pub mod disk;
pub mod memory;

pub use disk::Disk;
pub use memory::Memory;

use crate::block::BlockData;
use crate::error::ChainError;

/// Abstraction for block storage backends.
pub trait Storage: Send + Sync {
    /// Persists the block under its number, replacing any existing record.
    fn write(&self, block: &BlockData) -> Result<(), ChainError>;

    /// Reads the block with the given number. A missing record is reported
    /// as [`ChainError::NotFound`].
    fn get_block(&self, number: u64) -> Result<BlockData, ChainError>;

    /// Destroys every stored block.
    fn reset(&self) -> Result<(), ChainError>;

    /// Releases any resources held by the backend.
    fn close(&self) -> Result<(), ChainError>;

    /// Returns a fresh iterator positioned before block 1.
    fn for_each(&self) -> ChainIter<'_, Self>
    where
        Self: Sized,
    {
        ChainIter::new(self)
    }
}

/// Forward-only cursor over the stored chain.
///
/// Only a missing block ends the chain: the call that finds the gap returns
/// [`ChainError::NotFound`] and every later call returns
/// [`ChainError::EndOfChain`]. Any other error is handed back without ending
/// iteration, and the failed number is not retried.
///
/// Used as an [`Iterator`], a corrupt record is yielded as an error and
/// replay moves on, but an [`ChainError::Io`] error ends the iteration after
/// it is yielded: the store itself is unreadable, so every later number
/// would fail the same way.
pub struct ChainIter<'a, S: Storage + ?Sized> {
    storage: &'a S,
    current: u64,
    done: bool,
    halted: bool,
}

impl<'a, S: Storage + ?Sized> ChainIter<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        ChainIter {
            storage,
            current: 0,
            done: false,
            halted: false,
        }
    }

    /// Reads the next block.
    pub fn next_block(&mut self) -> Result<BlockData, ChainError> {
        if self.done {
            return Err(ChainError::EndOfChain);
        }

        self.current += 1;
        let result = self.storage.get_block(self.current);
        if let Err(ChainError::NotFound(_)) = result {
            self.done = true;
        }
        result
    }

    /// Reports whether the end of the chain has been reached.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Number of the block most recently requested, 0 before the first call.
    pub fn current(&self) -> u64 {
        self.current
    }
}

/// Yields every block in order and stops at the end of the chain.
impl<S: Storage + ?Sized> Iterator for ChainIter<'_, S> {
    type Item = Result<BlockData, ChainError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        match self.next_block() {
            Ok(block) => Some(Ok(block)),
            Err(ChainError::NotFound(_)) | Err(ChainError::EndOfChain) => None,
            Err(e @ ChainError::Io(_)) => {
                self.halted = true;
                Some(Err(e))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
