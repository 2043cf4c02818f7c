//! TinyLedger - an in-memory ledger of account transfers
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, account state and the ledger state machine
//! - [`transaction`] - Transaction type and validation rules
//!
//! ## Hashing
//! - [`crypto`] - SHA-256 digests over canonical JSON
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`export`] - Read-only snapshots for printing and JSON export

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Hashing
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod export;
