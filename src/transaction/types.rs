/// Transaction types for TinyLedger
use crate::crypto::{canonical_digest, hash_to_hex, Sha256Hash};
use serde::ser::SerializeStruct;
use serde_json::json;

/// Sender value marking a coinbase (miner reward) transaction.
pub const COINBASE_SENDER: &str = "0";

/// A transfer of `amount` from `sender` to `recipient`.
///
/// The hash is computed once in the constructor; fields are private so a
/// transaction cannot drift away from its hash after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: i64,
    hash: Sha256Hash,
}

impl Transaction {
    /// Build a transaction. No validation happens here; the ledger checks it
    /// against the account state when it is applied.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: i64) -> Self {
        let sender = sender.into();
        let recipient = recipient.into();
        let hash = Self::calculate_hash(&sender, &recipient, amount);
        Transaction {
            sender,
            recipient,
            amount,
            hash,
        }
    }

    /// Miner reward paid to `beneficiary`.
    pub fn coinbase(beneficiary: impl Into<String>, reward: i64) -> Self {
        Self::new(COINBASE_SENDER, beneficiary, reward)
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender == COINBASE_SENDER
    }

    pub fn hash(&self) -> Sha256Hash {
        self.hash
    }

    pub fn hash_str(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Canonical object hashed into the transaction id.
    fn canonical_fields(sender: &str, recipient: &str, amount: i64) -> serde_json::Value {
        json!({
            "amount": amount,
            "recipient": recipient,
            "sender": sender,
        })
    }

    fn calculate_hash(sender: &str, recipient: &str, amount: i64) -> Sha256Hash {
        canonical_digest(&Self::canonical_fields(sender, recipient, amount))
    }

    /// Canonical object embedded in a block's hash input (includes the tx hash).
    pub(crate) fn canonical_entry(&self) -> serde_json::Value {
        json!({
            "amount": self.amount,
            "hash": self.hash_str(),
            "recipient": self.recipient,
            "sender": self.sender,
        })
    }
}

impl serde::Serialize for Transaction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Transaction", 4)?;
        s.serialize_field("amount", &self.amount)?;
        s.serialize_field("hash", &self.hash_str())?;
        s.serialize_field("recipient", &self.recipient)?;
        s.serialize_field("sender", &self.sender)?;
        s.end()
    }
}
