//! Core ledger functionality
//!
//! This module contains the fundamental components: transactions, blocks,
//! proof-of-work mining, and the hash-linked chain.

pub mod block;
pub mod chain;
pub mod monetary;
pub mod proof_of_work;
pub mod transaction;

pub use block::{Block, GENESIS_PRE_HASH, MAX_TRANSACTIONS_PER_BLOCK};
pub use chain::Chain;
pub use monetary::{BLOCK_REWARD, SATOSHIS_PER_COIN};
pub use proof_of_work::ProofOfWork;
pub use transaction::{
    Transaction, TxInput, TxOutput, UtxoTransaction, COINBASE_SENTINEL_INDEX, HASH_LENGTH,
};
