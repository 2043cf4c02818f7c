#![forbid(unsafe_code)]
//! Command-line driver for TinyLedger

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::str::FromStr;
use tinyledger::blockchain::Blockchain;
use tinyledger::config::load_config;
use tinyledger::crypto::hash_to_hex;
use tinyledger::export::ChainSnapshot;
use tinyledger::transaction::Transaction;
use tracing::Level;

#[derive(Parser)]
#[command(name = "tinyledger", version, about = "In-memory ledger of account transfers")]
struct Cli {
    /// Path to a TOML config file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "tinyledger.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the final chain as JSON instead of a summary
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mine two blocks for saya, send 1 to dia, then mine once more
    Demo,
    /// Submit transfers and mine a number of blocks
    Simulate {
        /// Account credited with block rewards (overrides miner.account)
        #[arg(short, long)]
        miner: Option<String>,

        /// Number of blocks to mine
        #[arg(short, long, default_value_t = 1)]
        blocks: u32,

        /// Transfer to submit before mining, as FROM:TO:AMOUNT (repeatable)
        #[arg(short, long = "transfer")]
        transfers: Vec<TransferArg>,
    },
}

#[derive(Clone, Debug)]
struct TransferArg {
    from: String,
    to: String,
    amount: i64,
}

impl FromStr for TransferArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [from, to, amount] = parts.as_slice() else {
            return Err(format!("expected FROM:TO:AMOUNT, got '{}'", s));
        };
        let amount = amount
            .parse::<i64>()
            .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;
        Ok(TransferArg {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.config)?;
    let mut chain = Blockchain::new(config.ledger.clone());

    match cli.command {
        Command::Demo => {
            chain.mine_block("saya");
            chain.mine_block("saya");
            chain.submit_transaction(Transaction::new("saya", "dia", 1));
            chain.mine_block("saya");
        }
        Command::Simulate {
            miner,
            blocks,
            transfers,
        } => {
            let miner = miner.unwrap_or(config.miner.account);
            for transfer in transfers {
                chain.submit_transaction(Transaction::new(
                    transfer.from,
                    transfer.to,
                    transfer.amount,
                ));
            }
            for _ in 0..blocks {
                chain.mine_block(&miner);
            }
        }
    }

    chain.verify_integrity()?;

    if cli.json {
        println!("{}", ChainSnapshot::capture(&chain).to_json_pretty()?);
    } else {
        print_summary(&chain);
    }
    Ok(())
}

fn print_summary(chain: &Blockchain) {
    println!("{}", "Current state".bright_cyan().bold());
    if chain.state().is_empty() {
        println!("  {}", "(no accounts)".dimmed());
    }
    for (account, balance) in chain.state().accounts() {
        println!("  {:<20} {}", account.bright_white(), balance);
    }
    println!();

    println!(
        "{} {}",
        "Blockchain".bright_cyan().bold(),
        format!("(height {}, {} pending)", chain.height(), chain.pending_len()).dimmed()
    );
    for block in chain.iter() {
        let previous = block
            .previous_hash()
            .map(|h| hash_to_hex(&h))
            .unwrap_or_else(|| "genesis".to_string());
        println!("  {} {}", "Block".bright_green(), block.hash_str().bright_white());
        println!("    previous:  {}", previous);
        println!("    timestamp: {}", block.timestamp());
        for tx in block.transactions() {
            let sender = if tx.is_coinbase() {
                "coinbase".yellow().to_string()
            } else {
                tx.sender().to_string()
            };
            println!(
                "    {} -> {} : {}",
                sender,
                tx.recipient(),
                tx.amount().to_string().bright_white()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer() {
        let t: TransferArg = "alice:bob:3".parse().unwrap();
        assert_eq!(t.from, "alice");
        assert_eq!(t.to, "bob");
        assert_eq!(t.amount, 3);
    }

    #[test]
    fn test_parse_transfer_rejects_bad_input() {
        assert!("alice:bob".parse::<TransferArg>().is_err());
        assert!("alice:bob:x".parse::<TransferArg>().is_err());
        assert!("a:b:1:2".parse::<TransferArg>().is_err());
    }
}
