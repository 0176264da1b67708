//! Error handling for the ledger
//!
//! This module provides the error types for all ledger operations.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
#[derive(Debug, Clone)]
pub enum LedgerError {
    /// Key generation, import, or derivation failures
    Key(String),
    /// Other cryptographic operation errors
    Crypto(String),
    /// Transaction construction/validation errors
    Transaction(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Insufficient funds for a transfer
    InsufficientFunds { required: u64, available: u64 },
    /// Sender or receiver not registered in the balance table
    UnknownAccount(String),
    /// An output with this (txid, index) key already exists
    DuplicateOutput { txid: String, index: u32 },
    /// No output exists for this (txid, index) key
    OutputNotFound { txid: String, index: u32 },
    /// The output was already consumed by an earlier transaction
    AlreadySpent { txid: String, index: u32 },
    /// Block validation errors
    InvalidBlock(String),
    /// Mining errors (cancelled or attempt budget exhausted)
    Mining(String),
    /// Predecessor-hash mismatch when appending to a chain
    ChainIntegrity(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Key(msg) => write!(f, "Key error: {msg}"),
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::Transaction(msg) => write!(f, "Transaction error: {msg}"),
            LedgerError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            LedgerError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: required {required}, available {available}"
                )
            }
            LedgerError::UnknownAccount(addr) => write!(f, "Unknown account: {addr}"),
            LedgerError::DuplicateOutput { txid, index } => {
                write!(f, "Duplicate output: {txid}:{index}")
            }
            LedgerError::OutputNotFound { txid, index } => {
                write!(f, "Output not found: {txid}:{index}")
            }
            LedgerError::AlreadySpent { txid, index } => {
                write!(f, "Output already spent: {txid}:{index}")
            }
            LedgerError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            LedgerError::Mining(msg) => write!(f, "Mining error: {msg}"),
            LedgerError::ChainIntegrity(msg) => write!(f, "Chain integrity error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
