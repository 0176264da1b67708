// Proof-of-work nonce search. Difficulty counts leading zero bytes of the
// block hash; the comparison goes through a big-integer target so a hash
// satisfies difficulty d exactly when hash < 2^(256 - 8d).
//
// The search itself has no attempt ceiling. Callers that need bounded latency
// either pass a cancellation flag (checked every iteration) or use the
// bounded variant, which fails loudly instead of handing back an unmined
// block.

use crate::core::Block;
use crate::error::{LedgerError, Result};
use crate::utils::double_sha256;
use num_bigint::{BigInt, Sign};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct ProofOfWork {
    block: Block,
    target: BigInt,
    difficulty: u32,
}

impl ProofOfWork {
    /// Build a search context for the block at the given difficulty
    /// (leading zero bytes, capped at the hash width).
    pub fn new(block: Block, difficulty: u32) -> ProofOfWork {
        let difficulty = difficulty.min(32);
        let mut target = BigInt::from(1);
        target <<= 256 - 8 * difficulty;
        ProofOfWork {
            block,
            target,
            difficulty,
        }
    }

    /// Check a mined block: its stored hash must match a recomputation from
    /// its own fields and satisfy the difficulty target.
    pub fn validate(block: &Block, difficulty: u32) -> bool {
        let pow = ProofOfWork::new(block.clone(), difficulty);
        let hash = pow.hash_for_nonce(block.get_nonce());
        if hash != block.get_hash() {
            return false;
        }
        let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());
        hash_int < pow.target
    }

    fn prepare_data(&self, nonce: u64) -> Vec<u8> {
        let mut data_bytes = vec![];
        data_bytes.extend(self.block.hash_transactions());
        data_bytes.extend(self.block.get_pre_block_hash());
        data_bytes.extend(self.block.get_timestamp().to_be_bytes());
        data_bytes.extend(nonce.to_be_bytes());
        data_bytes
    }

    fn hash_for_nonce(&self, nonce: u64) -> Vec<u8> {
        double_sha256(self.prepare_data(nonce).as_slice())
    }

    /// Search from nonce zero until a satisfying hash is found or the
    /// cancellation flag is raised.
    pub fn run(&self, cancel: &AtomicBool) -> Result<(u64, Vec<u8>)> {
        self.run_from(0, cancel)
    }

    /// Search from a caller-supplied starting nonce. Workers racing over a
    /// partitioned nonce space each start at their own offset; the first
    /// valid result wins and the rest get cancelled.
    pub fn run_from(&self, start_nonce: u64, cancel: &AtomicBool) -> Result<(u64, Vec<u8>)> {
        log::info!(
            "Mining block with difficulty {} (leading zero bytes)",
            self.difficulty
        );
        let mut nonce = start_nonce;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(LedgerError::Mining("Mining cancelled".to_string()));
            }
            let hash = self.hash_for_nonce(nonce);
            let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());
            if hash_int < self.target {
                return Ok((nonce, hash));
            }
            nonce = nonce.checked_add(1).ok_or_else(|| {
                LedgerError::Mining("Nonce space exhausted without a valid hash".to_string())
            })?;
        }
    }

    /// Bounded search: try at most `max_attempts` nonces and fail explicitly
    /// if none satisfies the target. A block is never accepted unmined.
    pub fn run_bounded(&self, max_attempts: u64) -> Result<(u64, Vec<u8>)> {
        for nonce in 0..max_attempts {
            let hash = self.hash_for_nonce(nonce);
            let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());
            if hash_int < self.target {
                return Ok((nonce, hash));
            }
        }
        Err(LedgerError::Mining(format!(
            "No valid hash within {max_attempts} attempts at difficulty {}",
            self.difficulty
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::wallet::Wallet;

    fn unmined_block() -> Block {
        let alice = Wallet::new().unwrap();
        let bob = Wallet::new().unwrap();
        let tx = Transaction::new(&alice, &bob.get_address(), 5).unwrap();
        Block::new_for_mining(vec![tx], vec![0u8; 32], 1_700_000_000_000)
    }

    #[test]
    fn test_mined_hash_meets_difficulty() {
        let block = unmined_block();
        let pow = ProofOfWork::new(block, 1);
        let cancel = AtomicBool::new(false);
        let (_, hash) = pow.run(&cancel).unwrap();
        assert_eq!(hash[0], 0);
    }

    #[test]
    fn test_cancellation_stops_the_search() {
        let block = unmined_block();
        // Difficulty high enough that the first iterations won't find a hash
        let pow = ProofOfWork::new(block, 8);
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            pow.run(&cancel),
            Err(LedgerError::Mining(_))
        ));
    }

    #[test]
    fn test_bounded_search_reports_exhaustion() {
        let block = unmined_block();
        let pow = ProofOfWork::new(block, 8);
        assert!(matches!(
            pow.run_bounded(3),
            Err(LedgerError::Mining(_))
        ));
    }

    #[test]
    fn test_same_nonce_same_hash() {
        let block = unmined_block();
        let pow = ProofOfWork::new(block, 1);
        assert_eq!(pow.hash_for_nonce(42), pow.hash_for_nonce(42));
        assert_ne!(pow.hash_for_nonce(42), pow.hash_for_nonce(43));
    }
}
