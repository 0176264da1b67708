// The unspent-output ledger. Every spendable coin is an output record keyed
// by (creating txid, output index); spending flips its flag exactly once and
// nothing ever resurrects a spent record. Applying a flat transfer does coin
// selection over the sender's unspent records and creates receiver + change
// outputs keyed by the transfer's own id.

use crate::core::Transaction;
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use data_encoding::HEXLOWER;
use std::collections::{HashMap, HashSet};

/// One unspent (or spent) transaction output record.
#[derive(Debug, Clone)]
pub struct Utxo {
    txid: Vec<u8>,
    vout: u32,
    owner: String,
    amount: u64,
    spent: bool,
}

impl Utxo {
    pub fn get_txid(&self) -> &[u8] {
        self.txid.as_slice()
    }

    pub fn get_vout(&self) -> u32 {
        self.vout
    }

    pub fn get_owner(&self) -> &str {
        self.owner.as_str()
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }
}

#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    utxos: HashMap<(Vec<u8>, u32), Utxo>,
}

impl UtxoSet {
    pub fn new() -> UtxoSet {
        UtxoSet {
            utxos: HashMap::new(),
        }
    }

    /// Insert a new unspent record. The (txid, index) key must be fresh.
    pub fn add(&mut self, txid: &[u8], vout: u32, owner: &str, amount: u64) -> Result<()> {
        let key = (txid.to_vec(), vout);
        if self.utxos.contains_key(&key) {
            return Err(LedgerError::DuplicateOutput {
                txid: HEXLOWER.encode(txid),
                index: vout,
            });
        }
        self.utxos.insert(
            key,
            Utxo {
                txid: txid.to_vec(),
                vout,
                owner: owner.to_string(),
                amount,
                spent: false,
            },
        );
        Ok(())
    }

    /// Look up a record by key; the caller inspects the spent flag.
    pub fn find(&self, txid: &[u8], vout: u32) -> Option<&Utxo> {
        self.utxos.get(&(txid.to_vec(), vout))
    }

    /// Consume an output. Flips the spent flag exactly once.
    pub fn spend(&mut self, txid: &[u8], vout: u32) -> Result<()> {
        let utxo = self
            .utxos
            .get_mut(&(txid.to_vec(), vout))
            .ok_or_else(|| LedgerError::OutputNotFound {
                txid: HEXLOWER.encode(txid),
                index: vout,
            })?;
        if utxo.spent {
            return Err(LedgerError::AlreadySpent {
                txid: HEXLOWER.encode(txid),
                index: vout,
            });
        }
        utxo.spent = true;
        Ok(())
    }

    /// Index an input/output transaction: consume its inputs (skipped for
    /// coinbase) and record its outputs as new unspent coins. All checks run
    /// before any mutation so a failing transaction changes nothing.
    pub fn index_transaction(&mut self, tx: &crate::core::UtxoTransaction) -> Result<()> {
        if !tx.is_coinbase() {
            // A transaction naming the same input twice must be rejected
            // here; letting it reach the spend loop would consume the input
            // on the first pass and then fail, destroying value
            let mut seen = HashSet::new();
            for vin in tx.get_vin() {
                let key = (vin.get_txid().to_vec(), vin.get_vout());
                if !seen.insert(key) {
                    return Err(LedgerError::AlreadySpent {
                        txid: HEXLOWER.encode(vin.get_txid()),
                        index: vin.get_vout(),
                    });
                }
                let utxo = self.find(vin.get_txid(), vin.get_vout()).ok_or_else(|| {
                    LedgerError::OutputNotFound {
                        txid: HEXLOWER.encode(vin.get_txid()),
                        index: vin.get_vout(),
                    }
                })?;
                if utxo.is_spent() {
                    return Err(LedgerError::AlreadySpent {
                        txid: HEXLOWER.encode(vin.get_txid()),
                        index: vin.get_vout(),
                    });
                }
            }
        }
        for (idx, _) in tx.get_vout().iter().enumerate() {
            if self.find(tx.get_id(), idx as u32).is_some() {
                return Err(LedgerError::DuplicateOutput {
                    txid: HEXLOWER.encode(tx.get_id()),
                    index: idx as u32,
                });
            }
        }

        if !tx.is_coinbase() {
            for vin in tx.get_vin() {
                self.spend(vin.get_txid(), vin.get_vout())?;
            }
        }
        for (idx, out) in tx.get_vout().iter().enumerate() {
            self.add(tx.get_id(), idx as u32, out.get_owner(), out.get_value())?;
        }
        Ok(())
    }

    /// Collect enough of the owner's unspent records to cover the amount.
    /// Returns the accumulated value and the selected keys.
    fn select_spendable(&self, owner: &str, amount: u64) -> Result<(u64, Vec<(Vec<u8>, u32)>)> {
        let mut accumulated = 0u64;
        let mut selected = Vec::new();
        for utxo in self.utxos.values() {
            if accumulated >= amount {
                break;
            }
            if !utxo.spent && utxo.owner == owner {
                accumulated = accumulated.checked_add(utxo.amount).ok_or_else(|| {
                    LedgerError::Transaction(format!("Selected value overflow for {owner}"))
                })?;
                selected.push((utxo.txid.clone(), utxo.vout));
            }
        }
        Ok((accumulated, selected))
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn unspent(&self) -> impl Iterator<Item = &Utxo> {
        self.utxos.values().filter(|u| !u.spent)
    }
}

impl Ledger for UtxoSet {
    fn funds_available(&self, address: &str, amount: u64) -> bool {
        self.balance_of(address) >= amount
    }

    fn apply(&mut self, tx: &Transaction) -> Result<()> {
        let sender = tx.get_sender();
        let amount = tx.get_amount();

        let (accumulated, selected) = self.select_spendable(sender, amount)?;
        if accumulated < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: self.balance_of(sender),
            });
        }
        // Re-applying the same transfer would collide on its output keys
        if self.find(tx.get_id(), 0).is_some() {
            return Err(LedgerError::DuplicateOutput {
                txid: HEXLOWER.encode(tx.get_id()),
                index: 0,
            });
        }

        for (txid, vout) in &selected {
            self.spend(txid, *vout)?;
        }
        self.add(tx.get_id(), 0, tx.get_receiver(), amount)?;
        let change = accumulated - amount;
        if change > 0 {
            self.add(tx.get_id(), 1, sender, change)?;
        }

        log::debug!(
            "Applied transfer {} consuming {} outputs",
            HEXLOWER.encode(tx.get_id()),
            selected.len()
        );
        Ok(())
    }

    fn balance_of(&self, address: &str) -> u64 {
        self.utxos
            .values()
            .filter(|u| !u.spent && u.owner == address)
            .map(|u| u.amount)
            .sum()
    }
}
