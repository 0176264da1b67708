// This file implements the two transaction shapes the ledger understands.
//
// The flat `Transaction` is a signed transfer record (sender, receiver,
// amount) - it's what flows through block assembly and both ledger variants.
// The `UtxoTransaction` is the closer-to-real representation with explicit
// inputs and outputs, including the coinbase issuance shape.

use crate::error::{LedgerError, Result};
use crate::utils::{double_sha256, serialize};
use crate::wallet::{validate_address, verify_signature, Wallet};
use serde::{Deserialize, Serialize};

/// Sentinel output index carried by the coinbase input
pub const COINBASE_SENTINEL_INDEX: u32 = u32::MAX;

/// Length in bytes of every transaction and block hash
pub const HASH_LENGTH: usize = 32;

/// A signed transfer of value from a sender address to a receiver address.
///
/// The id is computed once at construction over the full record; fields are
/// private, so a transaction can never be mutated after its id exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    id: Vec<u8>,
    sender: String,
    receiver: String,
    amount: u64,
    signature: Vec<u8>,
}

impl Transaction {
    /// Create and sign a transfer from the wallet's address to the receiver.
    pub fn new(sender_wallet: &Wallet, receiver: &str, amount: u64) -> Result<Transaction> {
        let mut tx = Self::build(&sender_wallet.get_address(), receiver, amount)?;
        tx.signature = sender_wallet.sign(&tx.signing_bytes())?;
        tx.id = tx.compute_id()?;
        Ok(tx)
    }

    /// Create a transfer without a signing key. The signature stays empty and
    /// the transaction verifies as unsigned; whether to accept it is the
    /// caller's policy.
    pub fn new_unsigned(sender: &str, receiver: &str, amount: u64) -> Result<Transaction> {
        let mut tx = Self::build(sender, receiver, amount)?;
        tx.id = tx.compute_id()?;
        Ok(tx)
    }

    fn build(sender: &str, receiver: &str, amount: u64) -> Result<Transaction> {
        if amount == 0 {
            return Err(LedgerError::Transaction(
                "Amount must be positive".to_string(),
            ));
        }
        if !validate_address(sender) {
            return Err(LedgerError::InvalidAddress(format!(
                "Invalid sender address: {sender}"
            )));
        }
        if !validate_address(receiver) {
            return Err(LedgerError::InvalidAddress(format!(
                "Invalid receiver address: {receiver}"
            )));
        }
        Ok(Transaction {
            id: vec![],
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
            signature: vec![],
        })
    }

    /// The canonical unsigned byte form the signature covers.
    fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.sender.as_bytes());
        bytes.extend(self.receiver.as_bytes());
        bytes.extend(self.amount.to_be_bytes());
        bytes
    }

    /// Check the signature against the sender's public key. An empty
    /// signature is treated as unverified; malformed bytes are false.
    pub fn verify(&self, sender_pub_key: &[u8]) -> bool {
        if self.signature.is_empty() {
            return false;
        }
        verify_signature(sender_pub_key, &self.signing_bytes(), &self.signature)
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    // Double hash of the canonical field serialization with the id zeroed out
    fn compute_id(&self) -> Result<Vec<u8>> {
        let tx_copy = Transaction {
            id: vec![],
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            amount: self.amount,
            signature: self.signature.clone(),
        };
        Ok(double_sha256(&serialize(&tx_copy)?))
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_receiver(&self) -> &str {
        self.receiver.as_str()
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }

    pub fn get_signature(&self) -> &[u8] {
        self.signature.as_slice()
    }
}

/// A reference to a prior transaction output being spent.
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TxInput {
    txid: Vec<u8>,
    vout: u32,
}

impl TxInput {
    pub fn new(txid: &[u8], vout: u32) -> TxInput {
        TxInput {
            txid: txid.to_vec(),
            vout,
        }
    }

    pub fn get_txid(&self) -> &[u8] {
        self.txid.as_slice()
    }

    pub fn get_vout(&self) -> u32 {
        self.vout
    }
}

/// A new spendable output: an amount locked to an owner address.
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TxOutput {
    value: u64,
    owner: String,
}

impl TxOutput {
    pub fn new(value: u64, owner: &str) -> Result<TxOutput> {
        if value == 0 {
            return Err(LedgerError::Transaction(
                "Output value must be positive".to_string(),
            ));
        }
        if !validate_address(owner) {
            return Err(LedgerError::InvalidAddress(format!(
                "Invalid output owner address: {owner}"
            )));
        }
        Ok(TxOutput {
            value,
            owner: owner.to_string(),
        })
    }

    pub fn get_value(&self) -> u64 {
        self.value
    }

    pub fn get_owner(&self) -> &str {
        self.owner.as_str()
    }
}

/// The input/output transaction representation, consumed by the unspent
/// output set. The coinbase shape is structural: exactly one input whose
/// prior reference is the all-zero txid with the sentinel index.
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct UtxoTransaction {
    id: Vec<u8>,
    version: u32,
    vin: Vec<TxInput>,
    vout: Vec<TxOutput>,
    locktime: u32,
}

impl UtxoTransaction {
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Result<UtxoTransaction> {
        if outputs.is_empty() {
            return Err(LedgerError::Transaction(
                "Transaction must have at least one output".to_string(),
            ));
        }
        let mut tx = UtxoTransaction {
            id: vec![],
            version: 1,
            vin: inputs,
            vout: outputs,
            locktime: 0,
        };
        tx.id = tx.compute_id()?;
        Ok(tx)
    }

    /// Build a coinbase issuance paying the reward to the given address.
    pub fn new_coinbase(to: &str, reward: u64) -> Result<UtxoTransaction> {
        let sentinel = TxInput::new(&[0u8; HASH_LENGTH], COINBASE_SENTINEL_INDEX);
        Self::new(vec![sentinel], vec![TxOutput::new(reward, to)?])
    }

    /// True only for the exact sentinel input shape; any other single-input
    /// transaction is not a coinbase.
    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1
            && self.vin[0].txid == [0u8; HASH_LENGTH]
            && self.vin[0].vout == COINBASE_SENTINEL_INDEX
    }

    pub fn total_output_value(&self) -> Result<u64> {
        let mut total = 0u64;
        for out in &self.vout {
            total = total
                .checked_add(out.get_value())
                .ok_or_else(|| LedgerError::Transaction("Output value overflow".to_string()))?;
        }
        Ok(total)
    }

    fn compute_id(&self) -> Result<Vec<u8>> {
        let tx_copy = UtxoTransaction {
            id: vec![],
            version: self.version,
            vin: self.vin.clone(),
            vout: self.vout.clone(),
            locktime: self.locktime,
        };
        Ok(double_sha256(&serialize(&tx_copy)?))
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_vin(&self) -> &[TxInput] {
        self.vin.as_slice()
    }

    pub fn get_vout(&self) -> &[TxOutput] {
        self.vout.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Wallet;

    #[test]
    fn test_signed_transaction_verifies() {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        let tx = Transaction::new(&alice, &bob.get_address(), 5).unwrap();

        assert!(tx.is_signed());
        assert!(tx.verify(&alice.get_public_key()));
        assert!(!tx.verify(&bob.get_public_key()));
        assert_eq!(tx.get_id().len(), HASH_LENGTH);
    }

    #[test]
    fn test_unsigned_transaction_is_unverified() {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        let tx = Transaction::new_unsigned(&alice.get_address(), &bob.get_address(), 5).unwrap();

        assert!(!tx.is_signed());
        assert!(!tx.verify(&alice.get_public_key()));
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        assert!(Transaction::new(&alice, &bob.get_address(), 0).is_err());
    }

    #[test]
    fn test_invalid_receiver_is_rejected() {
        let alice = Wallet::new().unwrap();
        assert!(Transaction::new(&alice, "not-an-address", 5).is_err());
    }

    #[test]
    fn test_txid_depends_on_content() {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        let tx1 = Transaction::new_unsigned(&alice.get_address(), &bob.get_address(), 5).unwrap();
        let tx2 = Transaction::new_unsigned(&alice.get_address(), &bob.get_address(), 6).unwrap();
        let tx3 = Transaction::new_unsigned(&alice.get_address(), &bob.get_address(), 5).unwrap();

        assert_ne!(tx1.get_id(), tx2.get_id());
        assert_eq!(tx1.get_id(), tx3.get_id());
    }

    #[test]
    fn test_transaction_survives_serialization() {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        let tx = Transaction::new(&alice, &bob.get_address(), 5).unwrap();

        let bytes = crate::utils::serialize(&tx).unwrap();
        let decoded: Transaction = crate::utils::deserialize(&bytes).unwrap();
        assert_eq!(decoded.get_id(), tx.get_id());
        assert!(decoded.verify(&alice.get_public_key()));
    }

    #[test]
    fn test_coinbase_classification() {
        let miner = Wallet::new().unwrap();
        let coinbase = UtxoTransaction::new_coinbase(&miner.get_address(), 50).unwrap();
        assert!(coinbase.is_coinbase());

        // Single input, but not the sentinel shape
        let ordinary = UtxoTransaction::new(
            vec![TxInput::new(&[7u8; HASH_LENGTH], 0)],
            vec![TxOutput::new(50, &miner.get_address()).unwrap()],
        )
        .unwrap();
        assert!(!ordinary.is_coinbase());

        // All-zero txid but wrong index is still not a coinbase
        let wrong_index = UtxoTransaction::new(
            vec![TxInput::new(&[0u8; HASH_LENGTH], 0)],
            vec![TxOutput::new(50, &miner.get_address()).unwrap()],
        )
        .unwrap();
        assert!(!wrong_index.is_coinbase());
    }

    #[test]
    fn test_utxo_transaction_output_total() {
        let a = Wallet::new().unwrap();
        let tx = UtxoTransaction::new(
            vec![TxInput::new(&[7u8; HASH_LENGTH], 0)],
            vec![
                TxOutput::new(3, &a.get_address()).unwrap(),
                TxOutput::new(4, &a.get_address()).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(tx.total_output_value().unwrap(), 7);
    }
}
