use crate::crypto::{canonical_digest, hash_to_hex, Sha256Hash};
use crate::transaction::Transaction;
use serde_json::json;

/// An immutable batch of transactions linked to its predecessor by hash.
///
/// The predecessor is referenced only through `previous_hash`; the ledger
/// resolves it through its block index. A genesis block has no predecessor,
/// encoded as `null` in the hash input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Block {
    #[serde(serialize_with = "serialize_hash")]
    hash: Sha256Hash,
    #[serde(serialize_with = "serialize_link")]
    previous_hash: Option<Sha256Hash>,
    /// Unix time in milliseconds.
    timestamp: u64,
    transactions: Vec<Transaction>,
}

impl Block {
    /// Build a block on top of `previous`, stamped with the current time.
    pub fn new(transactions: Vec<Transaction>, previous: Option<&Block>) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self::with_timestamp(transactions, previous.map(Block::hash), timestamp)
    }

    /// Build a block with an explicit timestamp.
    pub fn with_timestamp(
        transactions: Vec<Transaction>,
        previous_hash: Option<Sha256Hash>,
        timestamp: u64,
    ) -> Self {
        let hash = Self::calculate_hash(previous_hash.as_ref(), timestamp, &transactions);
        Block {
            hash,
            previous_hash,
            timestamp,
            transactions,
        }
    }

    pub fn hash(&self) -> Sha256Hash {
        self.hash
    }

    pub fn hash_str(&self) -> String {
        hash_to_hex(&self.hash)
    }

    pub fn previous_hash(&self) -> Option<Sha256Hash> {
        self.previous_hash
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_none()
    }

    /// The leading coinbase transaction, if the block has one.
    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first().filter(|tx| tx.is_coinbase())
    }

    /// Recompute the digest from the block's content.
    pub fn content_hash(&self) -> Sha256Hash {
        Self::calculate_hash(self.previous_hash.as_ref(), self.timestamp, &self.transactions)
    }

    pub fn verify_hash(&self) -> bool {
        self.content_hash() == self.hash
    }

    fn calculate_hash(
        previous_hash: Option<&Sha256Hash>,
        timestamp: u64,
        transactions: &[Transaction],
    ) -> Sha256Hash {
        let entries: Vec<serde_json::Value> =
            transactions.iter().map(Transaction::canonical_entry).collect();
        canonical_digest(&json!({
            "previous_block": previous_hash.map(hash_to_hex),
            "timestamp": timestamp,
            "transactions": entries,
        }))
    }
}

fn serialize_hash<S: serde::Serializer>(hash: &Sha256Hash, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hash_to_hex(hash))
}

fn serialize_link<S: serde::Serializer>(
    link: &Option<Sha256Hash>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match link {
        Some(hash) => s.serialize_some(&hash_to_hex(hash)),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_txs() -> Vec<Transaction> {
        vec![
            Transaction::coinbase("alice", 1),
            Transaction::new("alice", "bob", 1),
        ]
    }

    #[test]
    fn test_same_content_same_hash() {
        let a = Block::with_timestamp(sample_txs(), None, 1_700_000_000_000);
        let b = Block::with_timestamp(sample_txs(), None, 1_700_000_000_000);
        assert_eq!(a.hash(), b.hash());
        assert!(a.verify_hash());
    }

    #[test]
    fn test_hash_covers_timestamp_transactions_and_parent() {
        let base = Block::with_timestamp(sample_txs(), None, 1_000);

        let later = Block::with_timestamp(sample_txs(), None, 1_001);
        assert_ne!(base.hash(), later.hash());

        let mut reordered = sample_txs();
        reordered.reverse();
        assert_ne!(base.hash(), Block::with_timestamp(reordered, None, 1_000).hash());

        let fewer = vec![Transaction::coinbase("alice", 1)];
        assert_ne!(base.hash(), Block::with_timestamp(fewer, None, 1_000).hash());

        let child_of_base = Block::with_timestamp(sample_txs(), Some(base.hash()), 1_000);
        let child_of_later = Block::with_timestamp(sample_txs(), Some(later.hash()), 1_000);
        assert_ne!(child_of_base.hash(), child_of_later.hash());
        assert_ne!(child_of_base.hash(), base.hash());
    }

    #[test]
    fn test_hash_matches_canonical_encoding() {
        let block = Block::with_timestamp(vec![], None, 42);
        let expected =
            crate::crypto::sha256(br#"{"previous_block":null,"timestamp":42,"transactions":[]}"#);
        assert_eq!(block.hash(), expected);
    }

    #[test]
    fn test_new_links_to_previous() {
        let genesis = Block::new(sample_txs(), None);
        assert!(genesis.is_genesis());
        assert!(genesis.timestamp() > 0);

        let next = Block::new(vec![Transaction::coinbase("bob", 1)], Some(&genesis));
        assert!(!next.is_genesis());
        assert_eq!(next.previous_hash(), Some(genesis.hash()));
    }

    #[test]
    fn test_coinbase_accessor() {
        let block = Block::with_timestamp(sample_txs(), None, 1);
        assert_eq!(block.coinbase().map(|tx| tx.recipient()), Some("alice"));

        let no_reward = Block::with_timestamp(vec![Transaction::new("a", "b", 0)], None, 1);
        assert!(no_reward.coinbase().is_none());
    }

    #[test]
    fn test_serialized_links_are_hex() {
        let genesis = Block::with_timestamp(sample_txs(), None, 1);
        let child = Block::with_timestamp(vec![], Some(genesis.hash()), 2);

        let value = serde_json::to_value(&genesis).unwrap();
        assert!(value["previous_hash"].is_null());
        assert_eq!(value["hash"], genesis.hash_str());

        let value = serde_json::to_value(&child).unwrap();
        assert_eq!(value["previous_hash"], genesis.hash_str());
        assert_eq!(value["transactions"].as_array().map(Vec::len), Some(0));
    }
}
