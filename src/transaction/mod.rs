pub mod amount;
pub mod model;

pub use model::Transaction;

/// Reserved sender for minted coins; exempt from balance checks.
pub const MINT_ADDRESS: &str = "00";
