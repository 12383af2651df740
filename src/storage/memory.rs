//! In-memory storage, useful for tests and ephemeral runs.

use crate::block::BlockData;
use crate::error::ChainError;
use crate::storage::Storage;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Memory {
    blocks: Arc<Mutex<BTreeMap<u64, BlockData>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for Memory {
    fn write(&self, block: &BlockData) -> Result<(), ChainError> {
        self.blocks.lock().insert(block.number(), block.clone());
        Ok(())
    }

    fn get_block(&self, number: u64) -> Result<BlockData, ChainError> {
        self.blocks
            .lock()
            .get(&number)
            .cloned()
            .ok_or(ChainError::NotFound(number))
    }

    fn reset(&self) -> Result<(), ChainError> {
        self.blocks.lock().clear();
        Ok(())
    }

    fn close(&self) -> Result<(), ChainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::block;

    #[test]
    fn test_iterates_in_order_then_ends() {
        let store = Memory::new();
        for number in [3, 1, 2] {
            store.write(&block(number, 1)).unwrap();
        }

        let mut iter = store.for_each();
        for expected in 1..=3 {
            assert!(!iter.done());
            assert_eq!(iter.next_block().unwrap().number(), expected);
        }
        assert!(!iter.done());
        assert_eq!(iter.next_block(), Err(ChainError::NotFound(4)));
        assert!(iter.done());
        assert_eq!(iter.next_block(), Err(ChainError::EndOfChain));
        assert_eq!(iter.current(), 4);
    }

    #[test]
    fn test_gap_ends_chain() {
        let store = Memory::new();
        store.write(&block(1, 0)).unwrap();
        store.write(&block(3, 0)).unwrap();

        let numbers: Vec<u64> = store
            .for_each()
            .map(|block| block.unwrap().number())
            .collect();
        assert_eq!(numbers, vec![1]);
    }

    #[test]
    fn test_iterators_are_independent() {
        let store = Memory::new();
        store.write(&block(1, 0)).unwrap();

        let mut first = store.for_each();
        first.next_block().unwrap();
        let _ = first.next_block();
        assert!(first.done());

        let mut second = store.for_each();
        assert!(!second.done());
        assert_eq!(second.next_block().unwrap().number(), 1);
    }

    #[test]
    fn test_reset_clears() {
        let store = Memory::new();
        store.write(&block(1, 2)).unwrap();
        assert_eq!(store.len(), 1);

        store.reset().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get_block(1), Err(ChainError::NotFound(1)));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let store: Box<dyn Storage> = Box::new(Memory::new());
        store.write(&block(1, 0)).unwrap();

        let blocks: Vec<_> = crate::storage::ChainIter::new(store.as_ref())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 1);
    }
}
