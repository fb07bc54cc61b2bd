//! The node service: sole owner of the ledger and the one place where it
//! is mutated. Proof-of-work runs outside the lock and commits atomically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};

use crate::blockchain::index::{self, AddressData};
use crate::blockchain::{
    Block, BlockData, Ledger, MineLimits, NodeChain, Resolution, hash_block, proof_of_work,
    resolve,
};
use crate::config::NodeConfig;
use crate::error::{CoreError, CoreResult};
use crate::transaction::{MINT_ADDRESS, Transaction};

pub struct Node {
    ledger: Mutex<Ledger>,
    /// Bumped whenever the tip is replaced from outside; running searches
    /// started under an older epoch abort.
    mining_epoch: AtomicU64,
    node_address: String,
    mining_reward: f64,
    limits: MineLimits,
}

/// Everything a nonce search needs, captured from one consistent view.
#[derive(Debug, Clone)]
struct MiningJob {
    epoch: u64,
    previous_hash: String,
    index: u64,
    transactions: Vec<Transaction>,
}

impl MiningJob {
    fn data(&self) -> BlockData<'_> {
        BlockData {
            transactions: &self.transactions,
            index: self.index,
        }
    }
}

/// Mining rounds a single `mine` call may spend before giving up.
const MAX_MINE_ATTEMPTS: usize = 8;

#[derive(Debug)]
enum Commit {
    Done(Block),
    /// Transactions were admitted while searching; the job must be redone.
    PoolGrew,
    /// Another local mine committed first; the job must be redone on the new tip.
    TipAdvanced,
}

impl Node {
    pub fn new(node_address: impl Into<String>, mining_reward: f64, limits: MineLimits) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            mining_epoch: AtomicU64::new(0),
            node_address: node_address.into(),
            mining_reward,
            limits,
        }
    }

    pub fn from_config(cfg: &NodeConfig) -> Self {
        Self::new(cfg.node_address.clone(), cfg.mining_reward, cfg.mine_limits())
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("mutex poisoned")
    }

    /* ---------- queries (run on a snapshot) ---------- */

    pub fn chain(&self) -> Arc<Vec<Block>> {
        self.ledger().snapshot()
    }

    pub fn export(&self) -> NodeChain {
        self.ledger().export()
    }

    pub fn lookup_block(&self, hash: &str) -> Option<Block> {
        let chain = self.chain();
        index::find_block(&chain, hash).cloned()
    }

    pub fn lookup_transaction(&self, transaction_id: &str) -> Option<(Block, Transaction)> {
        let chain = self.chain();
        index::find_transaction(&chain, transaction_id)
            .map(|found| (found.block.clone(), found.transaction.clone()))
    }

    pub fn lookup_address(&self, address: &str) -> Option<AddressData> {
        index::lookup_address(&self.chain(), address)
    }

    /* ---------- transactions ---------- */

    pub fn create_transaction(
        &self,
        amount: f64,
        sender: &str,
        recipient: &str,
    ) -> CoreResult<Transaction> {
        self.ledger().create_transaction(amount, sender, recipient)
    }

    pub fn admit_transaction(&self, tx: Transaction) -> CoreResult<u64> {
        self.ledger().admit_transaction(tx)
    }

    /* ---------- mining ---------- */

    /// Mine the pending pool into a new block, commit it and queue this
    /// node's reward for the next block.
    ///
    /// Blocking; callers on an async runtime should run it on a worker.
    /// Fails with `ProofFailed` when the search bound runs out, the tip is
    /// replaced by a peer while searching, or every round went stale.
    pub fn mine(&self) -> CoreResult<Block> {
        self.mine_within(MAX_MINE_ATTEMPTS)
    }

    fn mine_within(&self, attempts: usize) -> CoreResult<Block> {
        for attempt in 1..=attempts {
            let job = self.start_job()?;
            let (nonce, hash) = self.solve(&job)?;
            match self.commit(job, nonce, hash)? {
                Commit::Done(block) => return Ok(block),
                Commit::PoolGrew | Commit::TipAdvanced => {
                    debug!("MINER - round {attempt}/{attempts} went stale");
                }
            }
        }
        warn!("MINER - gave up after {attempts} stale rounds");
        Err(CoreError::ProofFailed)
    }

    /// Abort every search currently in flight.
    pub fn cancel_mining(&self) {
        let epoch = self.mining_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("MINER - mining epoch advanced to {epoch}");
    }

    fn start_job(&self) -> CoreResult<MiningJob> {
        let ledger = self.ledger();
        Ok(MiningJob {
            epoch: self.mining_epoch.load(Ordering::SeqCst),
            previous_hash: ledger.last_block().hash.clone(),
            index: ledger.next_index()?,
            transactions: ledger.pending().to_vec(),
        })
    }

    fn is_superseded(&self, job: &MiningJob) -> bool {
        self.mining_epoch.load(Ordering::SeqCst) != job.epoch
    }

    fn solve(&self, job: &MiningJob) -> CoreResult<(u64, String)> {
        debug!(
            "MINER - searching block #{} over {} txs (prev={})",
            job.index,
            job.transactions.len(),
            job.previous_hash
        );
        let data = job.data();
        let nonce = proof_of_work(&job.previous_hash, &data, self.limits, || {
            self.is_superseded(job)
        })?;
        Ok((nonce, hash_block(&job.previous_hash, &data, nonce)))
    }

    fn commit(&self, job: MiningJob, nonce: u64, hash: String) -> CoreResult<Commit> {
        let mut ledger = self.ledger();

        if self.is_superseded(&job) {
            warn!("MINER - block #{} superseded before commit", job.index);
            return Err(CoreError::ProofFailed);
        }
        if ledger.last_block().hash != job.previous_hash {
            debug!(
                "MINER - tip moved past block #{} while mining, retrying",
                job.index
            );
            return Ok(Commit::TipAdvanced);
        }
        if ledger.pending().len() != job.transactions.len() {
            debug!(
                "MINER - pool grew {} -> {} while mining, retrying",
                job.transactions.len(),
                ledger.pending().len()
            );
            return Ok(Commit::PoolGrew);
        }
        if ledger.len() as u64 + 1 != job.index {
            return Err(CoreError::unexpected(format!(
                "tip index {} does not match chain length {}",
                job.index - 1,
                ledger.len()
            )));
        }

        let block = ledger.create_block(nonce, job.previous_hash, hash);

        match ledger.create_transaction(self.mining_reward, MINT_ADDRESS, &self.node_address) {
            Ok(reward) => {
                if let Err(e) = ledger.admit_transaction(reward) {
                    warn!("MINER - reward not queued: {e}");
                }
            }
            Err(e) => warn!("MINER - reward not created: {e}"),
        }

        info!(
            "MINER - sealed block #{} (hash={}, nonce={})",
            block.index, block.hash, block.nonce
        );
        Ok(Commit::Done(block))
    }

    /* ---------- peers ---------- */

    /// Append a block mined elsewhere on top of our tip.
    pub fn receive_block(&self, block: Block) -> CoreResult<()> {
        let mut ledger = self.ledger();
        match ledger.receive_block(block) {
            Ok(()) => {
                self.cancel_mining();
                Ok(())
            }
            Err(e) => {
                warn!("PEER - block rejected: {e}");
                Err(e)
            }
        }
    }

    /// Run the longest-chain rule over peer reports. Returns whether the
    /// local chain was replaced, plus the resulting node view.
    pub fn resolve(&self, candidates: Vec<NodeChain>) -> (bool, NodeChain) {
        match resolve(candidates) {
            Resolution::Adopted(winner) => {
                let mut ledger = self.ledger();
                ledger.replace(winner);
                self.cancel_mining();
                (true, ledger.export())
            }
            Resolution::Kept => (false, self.export()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Commit, Node};
    use crate::blockchain::test_support::{mine_next, mined_chain};
    use crate::blockchain::{MineLimits, NodeChain, validate_chain};
    use crate::error::CoreError;
    use crate::transaction::Transaction;

    fn node() -> Node {
        Node::new("miner", 12.5, MineLimits::default())
    }

    fn submit(node: &Node, amount: f64, sender: &str, recipient: &str) -> (Transaction, u64) {
        let tx = node.create_transaction(amount, sender, recipient).unwrap();
        let index = node.admit_transaction(tx.clone()).unwrap();
        (tx, index)
    }

    fn pending(node: &Node) -> Vec<Transaction> {
        node.export().pending_transactions
    }

    fn valid(node: &Node) -> bool {
        validate_chain(&node.chain()).is_ok()
    }

    #[test]
    fn end_to_end_mine() {
        let node = node();
        let tx = node.create_transaction(10.0, "00", "A").unwrap();
        assert_eq!(node.admit_transaction(tx.clone()), Ok(2));

        let block = node.mine().unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(block.transactions, vec![tx]);
        assert_eq!(block.previous_block_hash, "0");
        assert!(block.hash.starts_with("0000"));

        assert_eq!(node.chain().len(), 2);
        assert_eq!(node.lookup_address("A").unwrap().balance, 10.0);
        assert!(valid(&node));

        // reward waits for the next block
        let pending = pending(&node);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].sender, "00");
        assert_eq!(pending[0].recipient, "miner");
        assert_eq!(pending[0].amount, 12.5);
        assert!(node.lookup_address("miner").is_none());

        node.mine().unwrap();
        assert_eq!(node.lookup_address("miner").unwrap().balance, 12.5);
        assert!(valid(&node));
    }

    #[test]
    fn lookups_return_owned_copies() {
        let node = node();
        let (tx, index) = submit(&node, 3.0, "00", "B");
        assert_eq!(index, 2);
        let block = node.mine().unwrap();

        assert_eq!(node.lookup_block(&block.hash), Some(block.clone()));
        let (found_block, found_tx) = node.lookup_transaction(&tx.transaction_id).unwrap();
        assert_eq!(found_block.index, 2);
        assert_eq!(found_tx, tx);
        assert!(node.lookup_block("nope").is_none());
        assert!(node.lookup_address("never-used-address").is_none());
    }

    #[test]
    fn exhausted_search_fails_without_commit() {
        let node = Node::new("miner", 12.5, MineLimits { max_nonce: 0 });
        submit(&node, 10.0, "00", "A");
        assert_eq!(node.mine(), Err(CoreError::ProofFailed));
        assert_eq!(node.chain().len(), 1);
        assert_eq!(pending(&node).len(), 1);
    }

    #[test]
    fn peer_block_cancels_running_search() {
        let node = node();
        let job = node.start_job().unwrap();

        let tip = node.chain().last().cloned().unwrap();
        let peer = mine_next(&tip, Vec::new());
        node.receive_block(peer).unwrap();

        assert_eq!(node.solve(&job), Err(CoreError::ProofFailed));
    }

    #[test]
    fn stale_solution_is_not_committed() {
        let node = node();
        let job = node.start_job().unwrap();
        let (nonce, hash) = node.solve(&job).unwrap();

        node.resolve(vec![NodeChain {
            chain: mined_chain(3),
            pending_transactions: Vec::new(),
        }]);

        assert!(matches!(
            node.commit(job, nonce, hash),
            Err(CoreError::ProofFailed)
        ));
        assert_eq!(node.chain().len(), 3);
    }

    #[test]
    fn grown_pool_forces_remine() {
        let node = node();
        let job = node.start_job().unwrap();
        let (nonce, hash) = node.solve(&job).unwrap();

        submit(&node, 1.0, "00", "late");
        assert!(matches!(
            node.commit(job, nonce, hash),
            Ok(Commit::PoolGrew)
        ));

        let block = node.mine().unwrap();
        assert_eq!(block.transactions.len(), 1);
        assert!(valid(&node));
    }

    #[test]
    fn losing_a_local_race_restarts_on_new_tip() {
        let node = node();
        let first = node.start_job().unwrap();
        let second = node.start_job().unwrap();
        let (n1, h1) = node.solve(&first).unwrap();
        let (n2, h2) = node.solve(&second).unwrap();

        assert!(matches!(node.commit(first, n1, h1), Ok(Commit::Done(_))));
        assert!(matches!(
            node.commit(second, n2, h2),
            Ok(Commit::TipAdvanced)
        ));

        // the retry mines on top of the winner, reward included
        let block = node.mine().unwrap();
        assert_eq!(block.index, 3);
        assert_eq!(block.transactions.len(), 1);
        assert!(valid(&node));
    }

    #[test]
    fn stale_rounds_are_bounded() {
        let node = node();
        submit(&node, 1.0, "00", "A");
        assert_eq!(node.mine_within(0), Err(CoreError::ProofFailed));
        assert_eq!(node.chain().len(), 1);
        assert_eq!(pending(&node).len(), 1);
    }

    #[test]
    fn exhausted_peer_indexes_are_rejected_and_node_stays_usable() {
        let node = node();
        let mut genesis = mined_chain(1).remove(0);
        genesis.index = u64::MAX;

        let (replaced, _) = node.resolve(vec![NodeChain {
            chain: vec![genesis],
            pending_transactions: Vec::new(),
        }]);
        assert!(!replaced);

        assert_eq!(submit(&node, 1.0, "00", "A").1, 2);
        assert_eq!(node.chain().len(), 1);
        assert!(node.mine().is_ok());
    }

    #[test]
    fn resolve_adopts_longest_valid_peer() {
        let node = node();
        submit(&node, 1.0, "00", "local");
        let peer_pending = vec![Transaction::new(2.0, "00", "peer")];

        let candidates = vec![
            NodeChain {
                chain: mined_chain(2),
                pending_transactions: Vec::new(),
            },
            NodeChain {
                chain: mined_chain(5),
                pending_transactions: peer_pending.clone(),
            },
            NodeChain {
                chain: mined_chain(3),
                pending_transactions: Vec::new(),
            },
        ];
        let (replaced, view) = node.resolve(candidates);
        assert!(replaced);
        assert_eq!(view.chain.len(), 5);
        assert_eq!(pending(&node), peer_pending);
    }

    #[test]
    fn resolve_keeps_local_when_longest_is_invalid() {
        let node = node();
        submit(&node, 1.0, "00", "local");
        let before = node.export();

        let mut broken = mined_chain(5);
        broken[4].previous_block_hash = "x".into();
        let (replaced, view) = node.resolve(vec![
            NodeChain {
                chain: mined_chain(2),
                pending_transactions: Vec::new(),
            },
            NodeChain {
                chain: broken,
                pending_transactions: Vec::new(),
            },
        ]);
        assert!(!replaced);
        assert_eq!(view, before);
    }

    #[test]
    fn shorter_peer_chain_still_replaces() {
        let node = node();
        node.resolve(vec![NodeChain {
            chain: mined_chain(4),
            pending_transactions: Vec::new(),
        }]);
        let (replaced, view) = node.resolve(vec![NodeChain {
            chain: mined_chain(2),
            pending_transactions: Vec::new(),
        }]);
        assert!(replaced);
        assert_eq!(view.chain.len(), 2);
    }
}
