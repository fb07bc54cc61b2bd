use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::validator::validate_chain;
use crate::transaction::Transaction;

/// What a node reports about itself: its chain and pending pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeChain {
    pub chain: Vec<Block>,
    #[serde(default)]
    pub pending_transactions: Vec<Transaction>,
}

/// Outcome of a longest-chain round.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No candidate, or the longest one failed validation.
    Kept,
    Adopted(NodeChain),
}

/// Longest-chain rule over peer candidates.
///
/// The longest candidate wins, the first one seen on ties. It is adopted
/// only if it validates; its length is not compared with the local chain.
pub fn resolve(candidates: Vec<NodeChain>) -> Resolution {
    let total = candidates.len();
    let mut longest: Option<NodeChain> = None;
    for candidate in candidates {
        let longer = longest
            .as_ref()
            .is_none_or(|best| candidate.chain.len() > best.chain.len());
        if longer {
            longest = Some(candidate);
        }
    }

    let Some(winner) = longest else {
        debug!("CONSENSUS - no candidates, keeping local chain");
        return Resolution::Kept;
    };

    if let Err(e) = validate_chain(&winner.chain) {
        warn!(
            "CONSENSUS - longest candidate (len={}) rejected: {}",
            winner.chain.len(),
            e
        );
        return Resolution::Kept;
    }

    info!(
        "CONSENSUS - adopting chain of length {} out of {} candidates",
        winner.chain.len(),
        total
    );
    Resolution::Adopted(winner)
}
