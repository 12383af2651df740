//! File-per-block storage
//!
//! Each block lives in `<root>/<number>.json` as indented JSON. Writes go to
//! a uniquely named temporary file in the same directory, which is synced and
//! then renamed over the final name, so a reader sees either the old record or
//! the new one, never a partial write. Concurrent writers of one number never
//! share a temporary file, and a failed write leaves no temporary file behind.

use crate::block::BlockData;
use crate::error::ChainError;
use crate::storage::Storage;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Disk {
    root: PathBuf,
}

impl Disk {
    /// Opens the store at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ChainError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            ChainError::Io(format!("Failed to create {}: {}", root.display(), e))
        })?;

        Ok(Disk { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn block_path(&self, number: u64) -> PathBuf {
        self.root.join(format!("{}.json", number))
    }
}

impl Storage for Disk {
    fn write(&self, block: &BlockData) -> Result<(), ChainError> {
        let json = serde_json::to_vec_pretty(block).map_err(|e| {
            ChainError::Serialization(format!("Failed to encode block {}: {}", block.number(), e))
        })?;

        let path = self.block_path(block.number());

        // Removed on drop, so every early return cleans up.
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;

        temp.persist(&path).map_err(|e| {
            ChainError::Io(format!(
                "Failed to finalize block {}: {}",
                block.number(),
                e.error
            ))
        })?;

        debug!(number = block.number(), txs = block.trans.len(), "wrote block");
        Ok(())
    }

    fn get_block(&self, number: u64) -> Result<BlockData, ChainError> {
        let file = match File::open(self.block_path(number)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ChainError::NotFound(number))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ChainError::Deserialization(format!("Failed to decode block {}: {}", number, e))
        })
    }

    fn reset(&self) -> Result<(), ChainError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.root)?;

        info!(path = %self.root.display(), "block store reset");
        Ok(())
    }

    /// Every read and write opens and closes its own file, so there is
    /// nothing to release.
    fn close(&self) -> Result<(), ChainError> {
        Ok(())
    }
}
