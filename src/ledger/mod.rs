//! Account state
//!
//! Two interchangeable ledger representations sit behind the [`Ledger`]
//! trait: a direct balance table and an unspent-output set. Block assembly
//! depends only on the trait, never on a concrete variant.

pub mod balance;
pub mod utxo;

use crate::core::Transaction;
use crate::error::Result;

pub use balance::BalanceTable;
pub use utxo::{Utxo, UtxoSet};

/// The capability contract every account-state representation offers.
pub trait Ledger {
    /// Whether the address can currently cover the amount.
    fn funds_available(&self, address: &str, amount: u64) -> bool;

    /// Apply a validated transfer. On failure the state is left unchanged;
    /// callers do not get a partially-applied transaction.
    fn apply(&mut self, tx: &Transaction) -> Result<()>;

    /// Current spendable balance for the address, zero for an unknown one.
    fn balance_of(&self, address: &str) -> u64;
}
