use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use super::block::{Block, meets_difficulty};
use super::consensus::NodeChain;
use super::index;
use crate::error::{CoreError, CoreResult};
use crate::transaction::Transaction;

/// One node's committed chain plus its pool of admitted, unmined transactions.
///
/// The chain sits behind an `Arc` so readers can keep an immutable snapshot
/// while the ledger appends (copy-on-write) or swaps in a replacement.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Arc<Vec<Block>>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: Arc::new(vec![Block::genesis()]),
            pending: Vec::new(),
        }
    }

    /// Cheap handle to the current chain; later mutations don't affect it.
    pub fn snapshot(&self) -> Arc<Vec<Block>> {
        Arc::clone(&self.chain)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Ledger should always have at least the genesis block")
    }

    /// Commit a block carrying the whole pending pool, then clear the pool.
    ///
    /// No checks happen here: `nonce` and `hash` are expected to come from
    /// `proof_of_work` and `hash_block` over the same pool.
    pub fn create_block(&mut self, nonce: u64, previous_hash: String, hash: String) -> Block {
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: Utc::now().timestamp_millis(),
            transactions: std::mem::take(&mut self.pending),
            nonce,
            hash,
            previous_block_hash: previous_hash,
        };
        Arc::make_mut(&mut self.chain).push(block.clone());
        info!(
            "LEDGER - committed block #{} (hash={}, nonce={}, txs={})",
            block.index,
            block.hash,
            block.nonce,
            block.transactions.len()
        );
        block
    }

    /// Build a transaction if `sender` can afford it. Does not touch the pool.
    pub fn create_transaction(
        &self,
        amount: f64,
        sender: &str,
        recipient: &str,
    ) -> CoreResult<Transaction> {
        check_amount(amount)?;
        index::check_balance(&self.chain, sender, amount)?;
        Ok(Transaction::new(amount, sender, recipient))
    }

    /// Add `tx` to the pending pool and return the index of the block it
    /// should land in.
    ///
    /// The balance check only sees the committed chain, so several pending
    /// transactions may jointly overdraw a sender.
    pub fn admit_transaction(&mut self, tx: Transaction) -> CoreResult<u64> {
        check_amount(tx.amount)?;
        index::check_balance(&self.chain, &tx.sender, tx.amount)?;
        let block_index = self.next_index()?;
        debug!(
            "LEDGER - admitted tx {} ({} -> {}, amount={}); pool size {}",
            tx.transaction_id,
            tx.sender,
            tx.recipient,
            tx.amount,
            self.pending.len() + 1
        );
        self.pending.push(tx);
        Ok(block_index)
    }

    /// Index the next block on this chain will carry.
    pub fn next_index(&self) -> CoreResult<u64> {
        let last = self.last_block();
        last.next_index().ok_or_else(|| {
            CoreError::unexpected(format!("block index {} has no successor", last.index))
        })
    }

    /// Append a block mined by a peer on top of our tip and clear the pool.
    pub fn receive_block(&mut self, block: Block) -> CoreResult<()> {
        let last = self.last_block();
        if block.previous_block_hash != last.hash || last.next_index() != Some(block.index) {
            return Err(CoreError::InvalidOrderChain {
                previous_index: last.index,
                current_index: block.index,
            });
        }
        let hash = block.recompute_hash(&last.hash);
        if !meets_difficulty(&hash) || hash != block.hash {
            return Err(CoreError::WrongHashBlock { hash });
        }

        info!(
            "LEDGER - accepted peer block #{} (hash={})",
            block.index, block.hash
        );
        Arc::make_mut(&mut self.chain).push(block);
        self.pending.clear();
        Ok(())
    }

    /// Swap in a whole chain and pool, as decided by consensus.
    pub fn replace(&mut self, adopted: NodeChain) {
        info!(
            "LEDGER - chain replaced: {} -> {} blocks, {} pending",
            self.chain.len(),
            adopted.chain.len(),
            adopted.pending_transactions.len()
        );
        self.chain = Arc::new(adopted.chain);
        self.pending = adopted.pending_transactions;
    }

    /// The `{chain, pendingTransactions}` view peers exchange.
    pub fn export(&self) -> NodeChain {
        NodeChain {
            chain: self.chain.to_vec(),
            pending_transactions: self.pending.clone(),
        }
    }
}

fn check_amount(amount: f64) -> CoreResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidAmount { amount })
    }
}
