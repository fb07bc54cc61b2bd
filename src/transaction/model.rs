use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transfer of `amount` between two opaque addresses.
///
/// Field order is part of the block-hash preimage and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(serialize_with = "super::amount::serialize")]
    pub amount: f64,
    pub sender: String,
    pub recipient: String,
    pub transaction_id: String,
}

impl Transaction {
    /// Build a transaction with a freshly allocated id (uuid, no dashes).
    pub fn new(amount: f64, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            amount,
            sender: sender.into(),
            recipient: recipient.into(),
            transaction_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn involves(&self, address: &str) -> bool {
        self.sender == address || self.recipient == address
    }
}
