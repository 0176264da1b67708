// Block assembly and mining. A block bundles a bounded batch of validated
// transfers, links to its predecessor by hash, and is sealed by the
// proof-of-work search.
//
// Assembly applies each accepted transaction to the ledger as it goes, so
// state changes are not transactional across the whole block: a later
// rejection does not undo an earlier transaction's effect.

use crate::core::{ProofOfWork, Transaction};
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::utils::{current_timestamp, double_sha256};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;

/// Upper bound on transactions consumed per block. Candidate batching is the
/// caller's job; anything past this count is excluded from the block.
pub const MAX_TRANSACTIONS_PER_BLOCK: usize = 10;

/// The all-zero predecessor hash carried by a genesis block.
pub const GENESIS_PRE_HASH: [u8; 32] = [0u8; 32];

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    timestamp: i64,
    pre_block_hash: Vec<u8>,
    hash: Vec<u8>,
    transactions: Vec<Transaction>,
    nonce: u64,
}

impl Block {
    /// Assemble a block from candidate transactions and mine it.
    ///
    /// Each candidate is checked against its sender's public key when one is
    /// supplied (a signed transaction without a key is let through with a
    /// logged warning - a simplification, not a security property) and then
    /// applied to the ledger. A transaction failing either check is dropped
    /// from the block; assembly continues with the rest.
    pub fn assemble_and_mine(
        candidates: &[Transaction],
        pre_block_hash: Option<&[u8]>,
        sender_keys: &[Option<Vec<u8>>],
        ledger: &mut dyn Ledger,
        difficulty: u32,
    ) -> Result<Block> {
        let cancel = AtomicBool::new(false);
        Self::assemble_and_mine_at(
            candidates,
            pre_block_hash,
            sender_keys,
            ledger,
            difficulty,
            current_timestamp()?,
            &cancel,
        )
    }

    /// Full-control assembly variant with an explicit timestamp and
    /// cancellation flag. Tests use a fixed timestamp; long-running callers
    /// can abort the nonce search through the flag.
    pub fn assemble_and_mine_at(
        candidates: &[Transaction],
        pre_block_hash: Option<&[u8]>,
        sender_keys: &[Option<Vec<u8>>],
        ledger: &mut dyn Ledger,
        difficulty: u32,
        timestamp: i64,
        cancel: &AtomicBool,
    ) -> Result<Block> {
        let mut accepted: Vec<Transaction> = Vec::new();

        for (idx, tx) in candidates.iter().enumerate() {
            if accepted.len() == MAX_TRANSACTIONS_PER_BLOCK {
                log::warn!(
                    "Block is full, excluding {} remaining candidates",
                    candidates.len() - idx
                );
                break;
            }

            match sender_keys.get(idx).and_then(|key| key.as_ref()) {
                Some(pub_key) => {
                    if !tx.is_signed() {
                        log::warn!("Transaction {idx} is unsigned, accepting without verification");
                    } else if !tx.verify(pub_key) {
                        log::warn!("Transaction {idx} failed signature verification, dropping");
                        continue;
                    }
                }
                None => {
                    if tx.is_signed() {
                        log::warn!("Transaction {idx} signature check skipped (no public key)");
                    }
                }
            }

            if let Err(e) = ledger.apply(tx) {
                log::warn!("Transaction {idx} failed ledger validation, dropping: {e}");
                continue;
            }
            accepted.push(tx.clone());
        }

        let pre_block_hash = match pre_block_hash {
            Some(hash) => {
                if hash.len() != GENESIS_PRE_HASH.len() {
                    return Err(LedgerError::InvalidBlock(format!(
                        "Predecessor hash must be {} bytes, got {}",
                        GENESIS_PRE_HASH.len(),
                        hash.len()
                    )));
                }
                hash.to_vec()
            }
            None => GENESIS_PRE_HASH.to_vec(),
        };

        let mut block = Block {
            timestamp,
            pre_block_hash,
            hash: vec![],
            transactions: accepted,
            nonce: 0,
        };

        let pow = ProofOfWork::new(block.clone(), difficulty);
        let (nonce, hash) = pow.run(cancel)?;
        block.nonce = nonce;
        block.hash = hash;
        log::info!(
            "Mined block {} with {} transactions (nonce {})",
            HEXLOWER.encode(&block.hash),
            block.transactions.len(),
            block.nonce
        );

        Ok(block)
    }

    /// An unmined block shell for the proof-of-work search.
    pub(crate) fn new_for_mining(
        transactions: Vec<Transaction>,
        pre_block_hash: Vec<u8>,
        timestamp: i64,
    ) -> Block {
        Block {
            timestamp,
            pre_block_hash,
            hash: vec![],
            transactions,
            nonce: 0,
        }
    }

    /// Single digest standing in for a merkle root: the double hash of all
    /// transaction ids concatenated in block order.
    pub fn hash_transactions(&self) -> Vec<u8> {
        let mut txids = vec![];
        for transaction in &self.transactions {
            txids.extend(transaction.get_id());
        }
        double_sha256(txids.as_slice())
    }

    pub fn is_genesis(&self) -> bool {
        self.pre_block_hash == GENESIS_PRE_HASH
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_pre_block_hash(&self) -> &[u8] {
        self.pre_block_hash.as_slice()
    }

    pub fn get_hash(&self) -> &[u8] {
        self.hash.as_slice()
    }

    pub fn get_hash_hex(&self) -> String {
        HEXLOWER.encode(self.hash.as_slice())
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }
}
