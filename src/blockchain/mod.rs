pub mod block;
pub mod consensus;
pub mod index;
pub mod model;
pub mod pow;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use block::{Block, BlockData, hash_block};
pub use consensus::{NodeChain, Resolution, resolve};
pub use model::Ledger;
pub use pow::{MineLimits, proof_of_work};
pub use validator::validate_chain;

/// Proof-of-Work target: a block hash (hex) must start with this.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Fixed genesis fields every node must agree on.
pub const GENESIS_INDEX: u64 = 1;
pub const GENESIS_NONCE: u64 = 100;
pub const GENESIS_HASH: &str = "0";
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Default nonce search bound before mining gives up.
pub const DEFAULT_MAX_NONCE: u64 = 50_000_000;

/// Coins minted to the node for each block it mines.
pub const DEFAULT_MINING_REWARD: f64 = 12.5;
