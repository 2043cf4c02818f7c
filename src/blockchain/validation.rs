use crate::blockchain::block::Block;
use crate::crypto::{hash_to_hex, Sha256Hash};
use crate::error::ChainError;

/// Check that `block` extends the chain whose tip is `head`.
pub fn validate_linkage(head: Option<Sha256Hash>, block: &Block) -> Result<(), ChainError> {
    if block.previous_hash() != head {
        return Err(ChainError::ChainContinuityViolation {
            expected: head.as_ref().map(hash_to_hex),
            found: block.previous_hash().as_ref().map(hash_to_hex),
        });
    }
    Ok(())
}

/// Check that the stored block hash matches its content.
pub fn validate_block_hash(block: &Block) -> Result<(), ChainError> {
    let computed = block.content_hash();
    if computed != block.hash() {
        return Err(ChainError::InvalidBlockHash {
            stored: block.hash_str(),
            computed: hash_to_hex(&computed),
        });
    }
    Ok(())
}
