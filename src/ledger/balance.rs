// The balance-table ledger: the simplest account model, one u64 balance per
// address. Applying a transfer is check-then-act - registration and funds
// checks happen before any mutation, so a failed apply never moves money.
// Not safe for concurrent callers without external serialization.

use crate::core::Transaction;
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct BalanceTable {
    accounts: HashMap<String, u64>,
}

impl BalanceTable {
    pub fn new() -> BalanceTable {
        BalanceTable {
            accounts: HashMap::new(),
        }
    }

    /// Register an account with an opening balance. Re-registering an address
    /// overwrites its balance.
    pub fn register(&mut self, address: &str, balance: u64) {
        self.accounts.insert(address.to_string(), balance);
    }

    pub fn is_registered(&self, address: &str) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn get_balance(&self, address: &str) -> u64 {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.accounts.iter()
    }
}

impl Ledger for BalanceTable {
    fn funds_available(&self, address: &str, amount: u64) -> bool {
        self.get_balance(address) >= amount
    }

    fn apply(&mut self, tx: &Transaction) -> Result<()> {
        let sender = tx.get_sender();
        let receiver = tx.get_receiver();
        let amount = tx.get_amount();

        if !self.is_registered(sender) {
            return Err(LedgerError::UnknownAccount(sender.to_string()));
        }
        if !self.is_registered(receiver) {
            return Err(LedgerError::UnknownAccount(receiver.to_string()));
        }

        let sender_balance = self.get_balance(sender);
        if sender_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: sender_balance,
            });
        }

        // The credit must be known to fit before either side is touched,
        // otherwise a failed apply would leave the sender already debited.
        // A self-transfer credits the post-debit balance, so it nets to zero.
        let receiver_balance = if receiver == sender {
            sender_balance - amount
        } else {
            self.get_balance(receiver)
        };
        let credited = receiver_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Transaction(format!("Balance overflow for {receiver}")))?;

        // All checks passed; debit and credit are observable immediately
        *self.accounts.get_mut(sender).expect("sender checked above") -= amount;
        *self
            .accounts
            .get_mut(receiver)
            .expect("receiver checked above") = credited;

        log::debug!("Applied transfer of {amount} from {sender} to {receiver}");
        Ok(())
    }

    fn balance_of(&self, address: &str) -> u64 {
        self.get_balance(address)
    }
}
