// The chain: an append-only, hash-authenticated list of mined blocks held in
// memory. Each non-genesis block must name its predecessor's hash; a failed
// append leaves the chain untouched.

use crate::core::{Block, ProofOfWork, GENESIS_PRE_HASH};
use crate::error::{LedgerError, Result};
use data_encoding::HEXLOWER;

#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Chain {
        Chain { blocks: Vec::new() }
    }

    /// Append a mined block. The first block must carry the all-zero
    /// predecessor hash; every later block must reference the current tip.
    pub fn append(&mut self, block: Block) -> Result<()> {
        match self.tip_hash() {
            None => {
                if !block.is_genesis() {
                    return Err(LedgerError::ChainIntegrity(
                        "First block must have an all-zero predecessor hash".to_string(),
                    ));
                }
            }
            Some(tip) => {
                if block.get_pre_block_hash() != tip {
                    return Err(LedgerError::ChainIntegrity(format!(
                        "Predecessor hash {} does not match tip {}",
                        HEXLOWER.encode(block.get_pre_block_hash()),
                        HEXLOWER.encode(tip)
                    )));
                }
            }
        }
        log::info!(
            "Appending block {} at height {}",
            block.get_hash_hex(),
            self.blocks.len()
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Hash of the most recent block, if any.
    pub fn tip_hash(&self) -> Option<&[u8]> {
        self.blocks.last().map(|b| b.get_hash())
    }

    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Scan the whole chain: genesis linkage, predecessor hashes, and each
    /// block's proof of work. Mutating any earlier block breaks the scan for
    /// everything after it.
    pub fn verify(&self, difficulty: u32) -> Result<()> {
        for (i, block) in self.blocks.iter().enumerate() {
            let expected_pre: &[u8] = if i == 0 {
                &GENESIS_PRE_HASH
            } else {
                self.blocks[i - 1].get_hash()
            };
            if block.get_pre_block_hash() != expected_pre {
                return Err(LedgerError::ChainIntegrity(format!(
                    "Block {i} predecessor hash does not match block {} hash",
                    i.saturating_sub(1)
                )));
            }
            if !ProofOfWork::validate(block, difficulty) {
                return Err(LedgerError::ChainIntegrity(format!(
                    "Block {i} fails proof-of-work validation"
                )));
            }
        }
        Ok(())
    }
}
