#![forbid(unsafe_code)]
//! Block store maintenance for a blockledger node: replay, inspect, reset.

use blockledger::config::load_config;
use blockledger::error::ChainError;
use blockledger::selector::StrategyRegistry;
use blockledger::storage::{Disk, Storage};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "ledger-node", about = "Replay and maintain the on-disk chain")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay every stored block and report the chain height
    Replay,
    /// Print a single block as JSON
    Block { number: u64 },
    /// Delete every stored block
    Reset,
    /// List the available selection strategies
    Strategies,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level: Level = config.logging.level.parse().map_err(|_| {
        ChainError::Config(format!("unknown log level {:?}", config.logging.level))
    })?;
    tracing_subscriber::fmt().with_max_level(level).init();

    // Catch a misconfigured strategy at startup rather than at block time.
    let registry = StrategyRegistry::new();
    registry.retrieve(&config.mempool.strategy)?;

    let storage = Disk::new(&config.database.path)?;
    info!(
        path = %storage.path().display(),
        chain_id = config.chain.chain_id,
        strategy = %config.mempool.strategy,
        "opened block store"
    );

    match cli.command.unwrap_or(Command::Replay) {
        Command::Replay => replay(&storage, config.chain.chain_id)?,
        Command::Block { number } => {
            let block = storage.get_block(number)?;
            println!("{}", serde_json::to_string_pretty(&block)?);
        }
        Command::Reset => storage.reset()?,
        Command::Strategies => {
            for name in registry.names() {
                println!("{}", name);
            }
        }
    }

    storage.close()?;
    Ok(())
}

fn replay(storage: &Disk, chain_id: u16) -> Result<(), ChainError> {
    let mut height = 0;
    let mut iter = storage.for_each();

    while !iter.done() {
        let block = match iter.next_block() {
            Ok(block) => block,
            Err(ChainError::NotFound(_)) => break,
            Err(e) => return Err(e),
        };

        if block.hash != block.header.hash() {
            warn!(number = block.number(), "stored block hash does not match its header");
        }
        for tx in &block.trans {
            if let Err(e) = tx.signed_tx.validate(chain_id) {
                warn!(number = block.number(), tx = %tx, error = %e, "invalid transaction in block");
            }
        }

        info!(number = block.number(), hash = %block.hash, txs = block.trans.len(), "replayed block");
        height = block.number();
    }

    info!(height, "chain replay complete");
    Ok(())
}
