use log::{debug, warn};

use super::block::{BlockData, hash_block, meets_difficulty};
use crate::error::{CoreError, CoreResult};

/// How often (in nonces) the search polls its cancellation predicate.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Bounds for a single nonce search.
#[derive(Debug, Clone, Copy)]
pub struct MineLimits {
    /// Nonces `0..max_nonce` are tried before giving up.
    pub max_nonce: u64,
}

impl Default for MineLimits {
    fn default() -> Self {
        Self {
            max_nonce: super::DEFAULT_MAX_NONCE,
        }
    }
}

/// Find the smallest nonce whose block hash meets the difficulty prefix.
///
/// The search is sequential from 0, so every node mining the same
/// `(previous_hash, data)` lands on the same nonce. `is_cancelled` is
/// polled periodically; a cancelled or exhausted search yields
/// `ProofFailed`.
pub fn proof_of_work<F>(
    previous_hash: &str,
    data: &BlockData<'_>,
    limits: MineLimits,
    is_cancelled: F,
) -> CoreResult<u64>
where
    F: Fn() -> bool,
{
    for nonce in 0..limits.max_nonce {
        if nonce % CANCEL_CHECK_INTERVAL == 0 && is_cancelled() {
            warn!(
                "POW - search for block #{} cancelled at nonce {}",
                data.index, nonce
            );
            return Err(CoreError::ProofFailed);
        }
        if meets_difficulty(&hash_block(previous_hash, data, nonce)) {
            debug!("POW - block #{} solved with nonce {}", data.index, nonce);
            return Ok(nonce);
        }
    }

    warn!(
        "POW - no nonce below {} solves block #{}",
        limits.max_nonce, data.index
    );
    Err(CoreError::ProofFailed)
}
