use serde::Serialize;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Every failure the ledger core can report. None of these are panics:
/// the transport decides how each kind is surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "type")]
pub enum CoreError {
    /// The nonce search hit its bound, was cancelled, or went stale.
    #[error("Proof of work failed")]
    ProofFailed,

    #[error("Block hash {hash} does not meet the difficulty prefix")]
    WrongHashBlock { hash: String },

    #[error("Block {current_index} is not linked to block {previous_index}")]
    #[serde(rename_all = "camelCase")]
    InvalidOrderChain {
        previous_index: u64,
        current_index: u64,
    },

    #[error("Genesis index must be {expected}, got {actual}")]
    InvalidGenesisIndex { expected: u64, actual: u64 },

    #[error("Genesis nonce must be {expected}, got {actual}")]
    InvalidGenesisNonce { expected: u64, actual: u64 },

    #[error("Genesis previous hash must be {expected:?}, got {actual:?}")]
    InvalidGenesisPreviousHash { expected: String, actual: String },

    #[error("Genesis block must not carry transactions")]
    GenesisHasTransaction,

    #[error("Transaction declined due to insufficient funds. balance={balance}")]
    InsufficientBalance { balance: f64 },

    #[error("Address({address}) was not found")]
    AddressNotFound { address: String },

    #[error("Transaction amount must be a positive number, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl CoreError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// True for the kinds produced by chain verification.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::WrongHashBlock { .. }
                | Self::InvalidOrderChain { .. }
                | Self::InvalidGenesisIndex { .. }
                | Self::InvalidGenesisNonce { .. }
                | Self::InvalidGenesisPreviousHash { .. }
                | Self::GenesisHasTransaction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn serializes_with_type_tag() {
        let e = CoreError::InvalidOrderChain {
            previous_index: 1,
            current_index: 2,
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "InvalidOrderChain");
        assert_eq!(v["previousIndex"], 1);
        assert_eq!(v["currentIndex"], 2);

        let v = serde_json::to_value(CoreError::ProofFailed).unwrap();
        assert_eq!(v, serde_json::json!({ "type": "ProofFailed" }));
    }

    #[test]
    fn display_matches_declined_note() {
        let e = CoreError::InsufficientBalance { balance: 3.0 };
        assert_eq!(
            e.to_string(),
            "Transaction declined due to insufficient funds. balance=3"
        );
    }

    #[test]
    fn integrity_kinds() {
        assert!(CoreError::GenesisHasTransaction.is_integrity_failure());
        assert!(!CoreError::ProofFailed.is_integrity_failure());
        assert!(
            !CoreError::AddressNotFound {
                address: "x".into()
            }
            .is_integrity_failure()
        );
    }
}
