//! # Microledger - My Minimal Blockchain Ledger
//!
//! This is my small but complete blockchain ledger that I built in Rust.
//! When I come back to this code, here's what I need to remember:
//!
//! ## What I Built
//! - **Key Management**: secp256k1 ECDSA keypairs with compressed public keys
//! - **Addresses**: hash160 of the public key, Base58Check encoded with a checksum
//! - **Transactions**: signed value transfers, plus a UTXO-style model with coinbase support
//! - **Two Ledgers**: a simple account balance table and a full unspent-output set
//! - **Proof of Work**: leading-zero-byte difficulty over a big-integer target
//! - **Chain**: in-memory hash-linked blocks with full integrity verification
//!
//! ## How I Organized My Code
//! - `core/`: blocks, transactions, mining, the monetary unit, and the chain
//! - `wallet/`: key management, address generation, transaction signing
//! - `ledger/`: the account-state representations and the trait that unifies them
//! - `config/`: runtime configuration with environment overrides
//! - `utils/`: cryptographic hash functions and serialization helpers
//! - `cli/`: command-line interface for the ledger operations
//!
//! ## Key Design Decisions I Made
//! - All amounts are u64 satoshis, never floating point
//! - Transaction ids are computed at construction and fields stay private,
//!   so an id can never drift out of sync with its contents
//! - Both ledger variants validate everything before mutating anything,
//!   so a failed transfer leaves state untouched
//! - Mining takes a cancellation flag instead of giving up silently

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for convenience
pub use cli::{Command, LedgerKind, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, Chain, ProofOfWork, Transaction, TxInput, TxOutput, UtxoTransaction, BLOCK_REWARD,
    COINBASE_SENTINEL_INDEX, GENESIS_PRE_HASH, MAX_TRANSACTIONS_PER_BLOCK, SATOSHIS_PER_COIN,
};
pub use error::{LedgerError, Result};
pub use ledger::{BalanceTable, Ledger, Utxo, UtxoSet};
pub use utils::{
    base58_decode, base58_encode, current_timestamp, double_sha256, hash160, ripemd160_digest,
    sha256_digest,
};
pub use wallet::{
    address_from_pub_key, convert_address, hash_pub_key, validate_address, verify_signature,
    Keypair, Keyring, Wallet, ADDRESS_CHECK_SUM_LEN,
};
