//! Read-only snapshot of a ledger for printing and JSON export.

use crate::blockchain::{AccountState, Block, Blockchain};
use crate::crypto::hash_to_hex;
use crate::error::ChainError;
use crate::transaction::Transaction;
use chrono::{TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChainSnapshot<'a> {
    pub state: &'a AccountState,
    pub height: u64,
    pub pending: usize,
    /// Head first, genesis last.
    pub blocks: Vec<BlockSummary<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary<'a> {
    pub hash: String,
    pub previous_hash: Option<String>,
    pub timestamp: u64,
    /// RFC 3339 rendering of `timestamp`.
    pub time: String,
    pub transactions: &'a [Transaction],
}

impl<'a> BlockSummary<'a> {
    fn from_block(block: &'a Block) -> Self {
        let time = i64::try_from(block.timestamp())
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        BlockSummary {
            hash: block.hash_str(),
            previous_hash: block.previous_hash().map(|h| hash_to_hex(&h)),
            timestamp: block.timestamp(),
            time,
            transactions: block.transactions(),
        }
    }
}

impl<'a> ChainSnapshot<'a> {
    pub fn capture(chain: &'a Blockchain) -> Self {
        ChainSnapshot {
            state: chain.state(),
            height: chain.height(),
            pending: chain.pending_len(),
            blocks: chain.iter().map(BlockSummary::from_block).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lists_head_first() {
        let mut chain = Blockchain::default();
        let genesis = chain.mine_block("alice").hash_str();
        let head = chain.mine_block("bob").hash_str();

        let snapshot = ChainSnapshot::capture(&chain);
        assert_eq!(snapshot.height, 2);
        assert_eq!(snapshot.blocks[0].hash, head);
        assert_eq!(snapshot.blocks[1].hash, genesis);
        assert_eq!(snapshot.blocks[0].previous_hash.as_deref(), Some(genesis.as_str()));
        assert!(snapshot.blocks[1].previous_hash.is_none());
    }

    #[test]
    fn test_out_of_range_timestamp_renders_empty_time() {
        let mut chain = Blockchain::default();
        chain
            .apply_block(Block::with_timestamp(vec![], None, u64::MAX))
            .unwrap();

        let snapshot = ChainSnapshot::capture(&chain);
        assert_eq!(snapshot.blocks[0].timestamp, u64::MAX);
        assert_eq!(snapshot.blocks[0].time, "");
    }

    #[test]
    fn test_json_state_is_sorted() {
        let mut chain = Blockchain::default();
        chain.mine_block("zoe");
        chain.mine_block("adam");

        let json = ChainSnapshot::capture(&chain).to_json_pretty().unwrap();
        let adam = json.find("\"adam\"").unwrap();
        let zoe = json.find("\"zoe\"").unwrap();
        assert!(adam < zoe);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"]["zoe"], 1);
        assert_eq!(value["pending"], 0);
        assert!(value["blocks"][0]["time"].as_str().unwrap().contains('T'));
    }
}
