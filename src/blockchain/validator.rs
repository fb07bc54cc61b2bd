use super::block::{Block, meets_difficulty};
use super::{GENESIS_INDEX, GENESIS_NONCE, GENESIS_PREVIOUS_HASH};
use crate::error::{CoreError, CoreResult};

/// Verify linkage, proof-of-work and genesis shape of any chain,
/// including ones received from peers. Reports the first failure found.
pub fn validate_chain(chain: &[Block]) -> CoreResult<()> {
    let Some(genesis) = chain.first() else {
        return Err(CoreError::unexpected("chain has no genesis block"));
    };

    for (i, pair) in chain.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.previous_block_hash != prev.hash || prev.next_index() != Some(current.index) {
            return Err(CoreError::InvalidOrderChain {
                previous_index: i as u64,
                current_index: i as u64 + 1,
            });
        }

        let hash = current.recompute_hash(&prev.hash);
        if !meets_difficulty(&hash) || hash != current.hash {
            return Err(CoreError::WrongHashBlock { hash });
        }
    }

    if genesis.index != GENESIS_INDEX {
        return Err(CoreError::InvalidGenesisIndex {
            expected: GENESIS_INDEX,
            actual: genesis.index,
        });
    }
    if genesis.nonce != GENESIS_NONCE {
        return Err(CoreError::InvalidGenesisNonce {
            expected: GENESIS_NONCE,
            actual: genesis.nonce,
        });
    }
    if genesis.previous_block_hash != GENESIS_PREVIOUS_HASH {
        return Err(CoreError::InvalidGenesisPreviousHash {
            expected: GENESIS_PREVIOUS_HASH.to_string(),
            actual: genesis.previous_block_hash.clone(),
        });
    }
    if !genesis.transactions.is_empty() {
        return Err(CoreError::GenesisHasTransaction);
    }

    Ok(())
}
