//! Configuration management for blockledger

use crate::error::ChainError;
use crate::selector::STRATEGY_TIP;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mempool: MempoolConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_data_dir")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MempoolConfig {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_max_block_txs")]
    pub max_block_txs: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir(),
        }
    }
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            max_block_txs: default_max_block_txs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_chain_id() -> u16 {
    1
}

fn default_data_dir() -> String {
    "./data/blocks".to_string()
}

fn default_strategy() -> String {
    STRATEGY_TIP.to_string()
}

fn default_max_block_txs() -> usize {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    let config = match fs::read_to_string(path) {
        Ok(text) => parse_config(&text)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => {
            return Err(ChainError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    config.validate()?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<Config, ChainError> {
    toml::from_str(text).map_err(|e| ChainError::Config(e.to_string()))
}

impl Config {
    /// Validate critical values
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.database.path.is_empty() {
            return Err(ChainError::Config("database.path must be set".to_string()));
        }
        if self.mempool.strategy.is_empty() {
            return Err(ChainError::Config(
                "mempool.strategy must be set".to_string(),
            ));
        }
        if self.mempool.max_block_txs == 0 {
            return Err(ChainError::Config(
                "mempool.max_block_txs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.chain.chain_id, 1);
        assert_eq!(config.database.path, "./data/blocks");
        assert_eq!(config.mempool.strategy, "tip");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = parse_config(
            r#"
            [chain]
            chain_id = 7

            [mempool]
            strategy = "tip_advanced"
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.chain_id, 7);
        assert_eq!(config.mempool.strategy, "tip_advanced");
        assert_eq!(config.mempool.max_block_txs, 500);
        assert_eq!(config.database.path, "./data/blocks");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database]\npath = \"\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ChainError::Config(_))));

        fs::write(&path, "[chain]\nchain_id = \"one\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ChainError::Config(_))));
    }
}
