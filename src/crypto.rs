//! Hashing primitives for TinyLedger
//!
//! Every content hash in the ledger is SHA-256 over a canonical JSON encoding:
//! object keys in ascending order, compact separators, UTF-8. Each value type
//! builds its own canonical object; this module only owns the digest and the
//! hex rendering.

use crate::error::ChainError;
use sha2::{Digest, Sha256};

/// Type alias for a 32-byte SHA-256 digest.
pub type Sha256Hash = [u8; 32];

/// Length of a hash rendered as hex.
pub const HASH_HEX_LEN: usize = 64;

/// Digest an arbitrary byte string.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    Sha256::digest(bytes).into()
}

/// Serialize a canonical JSON value and digest it.
///
/// The caller is responsible for building `value` with sorted keys; with the
/// default `serde_json` map this is guaranteed regardless of insertion order.
pub fn canonical_digest(value: &serde_json::Value) -> Sha256Hash {
    sha256(&canonical_bytes(value))
}

/// Compact JSON encoding used as hash input.
pub fn canonical_bytes(value: &serde_json::Value) -> Vec<u8> {
    // Serializing a `Value` cannot fail: keys are always strings.
    value.to_string().into_bytes()
}

/// Convert a hash to a hex string for display.
pub fn hash_to_hex(hash: &Sha256Hash) -> String {
    hex::encode(hash)
}

/// Parse a 64-character hex string into a hash.
pub fn hash_from_hex(hex_str: &str) -> Result<Sha256Hash, ChainError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| ChainError::InvalidHash(format!("invalid hex '{}': {}", hex_str, e)))?;
    if bytes.len() != 32 {
        return Err(ChainError::InvalidHash(format!(
            "hash must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| ChainError::InvalidHash("failed to convert bytes into hash".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            hash_to_hex(&sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_canonical_bytes_sort_keys() {
        let value = json!({ "sender": "a", "amount": 1, "recipient": "b" });
        assert_eq!(
            canonical_bytes(&value),
            br#"{"amount":1,"recipient":"b","sender":"a"}"#.to_vec()
        );
    }

    #[test]
    fn test_hex_round_trip_and_rejections() {
        let hash = sha256(b"ledger");
        let hex_str = hash_to_hex(&hash);
        assert_eq!(hex_str.len(), HASH_HEX_LEN);
        assert_eq!(hash_from_hex(&hex_str).unwrap(), hash);

        assert!(matches!(hash_from_hex("abcd"), Err(ChainError::InvalidHash(_))));
        assert!(matches!(hash_from_hex("zz"), Err(ChainError::InvalidHash(_))));
    }
}
