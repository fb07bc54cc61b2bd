//! Chain fixtures shared by the ledger tests.

use std::sync::OnceLock;

use super::block::{Block, hash_block};
use super::pow::{MineLimits, proof_of_work};
use crate::transaction::Transaction;

const FIXTURE_LEN: usize = 6;

/// Mine a block carrying `transactions` on top of `prev`.
pub fn mine_next(prev: &Block, transactions: Vec<Transaction>) -> Block {
    let mut block = Block {
        index: prev.index + 1,
        timestamp: prev.timestamp + 1,
        transactions,
        nonce: 0,
        hash: String::new(),
        previous_block_hash: prev.hash.clone(),
    };
    block.nonce = proof_of_work(&prev.hash, &block.data(), MineLimits::default(), || false)
        .expect("fixture block mines");
    block.hash = hash_block(&prev.hash, &block.data(), block.nonce);
    block
}

/// A valid chain of `len` blocks (genesis included), mined once per test
/// binary and handed out as prefixes. Block `n` mints `n` coins to "A".
pub fn mined_chain(len: usize) -> Vec<Block> {
    static CHAIN: OnceLock<Vec<Block>> = OnceLock::new();
    assert!((1..=FIXTURE_LEN).contains(&len), "fixture length out of range");

    let chain = CHAIN.get_or_init(|| {
        let mut genesis = Block::genesis();
        genesis.timestamp = 0;
        let mut chain = vec![genesis];
        while chain.len() < FIXTURE_LEN {
            let prev = chain.last().expect("non-empty");
            let tx = Transaction {
                amount: (prev.index + 1) as f64,
                sender: "00".into(),
                recipient: "A".into(),
                transaction_id: format!("fixture-{}", prev.index + 1),
            };
            let next = mine_next(prev, vec![tx]);
            chain.push(next);
        }
        chain
    });
    chain[..len].to_vec()
}
