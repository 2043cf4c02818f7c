//! Configuration management for TinyLedger

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub miner: MinerConfig,
}

/// Rules the ledger enforces when validating and mining.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Amount credited by each coinbase transaction.
    #[serde(default = "default_miner_reward")]
    pub miner_reward: i64,
    /// Maximum number of non-coinbase transactions in a mined block.
    #[serde(default = "default_max_tx_per_block")]
    pub max_tx_per_block: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            miner_reward: default_miner_reward(),
            max_tx_per_block: default_max_tx_per_block(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MinerConfig {
    #[serde(default = "default_miner_account")]
    pub account: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            account: default_miner_account(),
        }
    }
}

fn default_miner_reward() -> i64 {
    1
}

fn default_max_tx_per_block() -> usize {
    5
}

fn default_miner_account() -> String {
    "miner".to_string()
}

impl Config {
    pub fn from_toml_str(config_str: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.ledger.miner_reward < 0 {
            return Err(ChainError::Config(
                "ledger.miner_reward must not be negative".to_string(),
            ));
        }
        if self.miner.account.trim().is_empty() {
            return Err(ChainError::Config("miner.account must be set".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from `path`, falling back to defaults when the file is absent.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    if !path.exists() {
        // Provide sane defaults when the config file is absent
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    Config::from_toml_str(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ledger.miner_reward, 1);
        assert_eq!(config.ledger.max_tx_per_block, 5);
        assert_eq!(config.miner.account, "miner");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("[ledger]\nmax_tx_per_block = 2\n").unwrap();
        assert_eq!(config.ledger.max_tx_per_block, 2);
        assert_eq!(config.ledger.miner_reward, 1);
        assert_eq!(config.miner.account, "miner");
    }

    #[test]
    fn test_negative_reward_rejected() {
        let result = Config::from_toml_str("[ledger]\nminer_reward = -1\n");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[test]
    fn test_empty_miner_rejected() {
        let result = Config::from_toml_str("[miner]\naccount = \"  \"\n");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = Config::from_toml_str("[ledger\nminer_reward = 1");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }
}
