//! Utility functions and helpers
//!
//! This module contains the hashing primitives, encoding functions,
//! and serialization helpers used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, double_sha256, hash160, ripemd160_digest,
    sha256_digest,
};

pub use serialization::{deserialize, serialize};
