use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{DIFFICULTY_PREFIX, GENESIS_HASH, GENESIS_INDEX, GENESIS_NONCE, GENESIS_PREVIOUS_HASH};
use crate::transaction::Transaction;

/// A committed block. Serialized field order is the wire format peers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix epoch, milliseconds
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub hash: String,
    pub previous_block_hash: String,
}

/// The part of a block covered by proof-of-work.
///
/// `transactions` is serialized before `index`; nodes that disagree on
/// this order never validate each other's chains.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlockData<'a> {
    pub transactions: &'a [Transaction],
    pub index: u64,
}

impl Block {
    /// The fixed first block every node starts from.
    pub fn genesis() -> Self {
        Self {
            index: GENESIS_INDEX,
            timestamp: Utc::now().timestamp_millis(),
            transactions: Vec::new(),
            nonce: GENESIS_NONCE,
            hash: GENESIS_HASH.to_string(),
            previous_block_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// Proof-of-work payload of this block.
    pub fn data(&self) -> BlockData<'_> {
        BlockData {
            transactions: &self.transactions,
            index: self.index,
        }
    }

    /// Index of the block that follows this one; `None` past `u64::MAX`.
    pub fn next_index(&self) -> Option<u64> {
        self.index.checked_add(1)
    }

    /// Recompute this block's hash on top of `previous_hash`.
    pub fn recompute_hash(&self, previous_hash: &str) -> String {
        hash_block(previous_hash, &self.data(), self.nonce)
    }
}

/// SHA-256 over `previous_hash ++ decimal(nonce) ++ json(data)`, hex encoded.
pub fn hash_block(previous_hash: &str, data: &BlockData<'_>, nonce: u64) -> String {
    // Plain structs of strings and numbers always serialize.
    let data_json = serde_json::to_string(data).expect("serialize block data");
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(data_json.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn meets_difficulty(hash: &str) -> bool {
    hash.starts_with(DIFFICULTY_PREFIX)
}
