//! Error types for TinyLedger

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("reward amount mismatch: expected {expected}, got {found}")]
    RewardMismatch { expected: i64, found: i64 },

    #[error("insufficient balance for account '{account}': has {balance}, needs {amount}")]
    InsufficientBalance {
        account: String,
        balance: i64,
        amount: i64,
    },

    #[error("negative transfer amount {0}")]
    NegativeAmount(i64),

    #[error("account '{0}' is reserved for coinbase transactions")]
    ReservedAccount(String),

    #[error("balance overflow for account '{0}'")]
    BalanceOverflow(String),

    /// The supplied block does not extend the current head.
    #[error("chain continuity violation: expected previous block {}, got {}", display_link(.expected), display_link(.found))]
    ChainContinuityViolation {
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("block contains invalid transaction #{index} ({tx_hash}): {reason}")]
    BlockContainsInvalidTransaction {
        index: usize,
        tx_hash: String,
        reason: Box<ChainError>,
    },

    #[error("block hash mismatch: stored {stored}, computed {computed}")]
    InvalidBlockHash { stored: String, computed: String },

    #[error("broken chain: {0}")]
    BrokenChain(String),

    #[error("replayed state does not match the live account state")]
    StateMismatch,

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

fn display_link(link: &Option<String>) -> &str {
    link.as_deref().unwrap_or("<genesis>")
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuity_message_names_genesis() {
        let err = ChainError::ChainContinuityViolation {
            expected: None,
            found: Some("ab".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "chain continuity violation: expected previous block <genesis>, got ab"
        );
    }

    #[test]
    fn test_nested_reason_is_rendered() {
        let err = ChainError::BlockContainsInvalidTransaction {
            index: 2,
            tx_hash: "ff".to_string(),
            reason: Box::new(ChainError::NegativeAmount(-3)),
        };
        assert!(err.to_string().ends_with("negative transfer amount -3"));
    }
}
