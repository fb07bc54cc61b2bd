//! Read-only queries over a committed chain. Nothing here is cached;
//! every call scans the blocks it is given.

use serde::Serialize;

use super::block::Block;
use crate::error::{CoreError, CoreResult};
use crate::transaction::{MINT_ADDRESS, Transaction};

/// Balance and history of one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub balance: f64,
    pub transactions: Vec<Transaction>,
}

/// A transaction together with the block that committed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionLocation<'a> {
    pub block: &'a Block,
    pub transaction: &'a Transaction,
}

/// `None` when the address never appears, which is distinct from a zero balance.
pub fn lookup_address(chain: &[Block], address: &str) -> Option<AddressData> {
    let transactions: Vec<Transaction> = chain
        .iter()
        .flat_map(|block| &block.transactions)
        .filter(|tx| tx.involves(address))
        .cloned()
        .collect();
    if transactions.is_empty() {
        return None;
    }

    let balance = transactions
        .iter()
        .map(|tx| {
            if tx.recipient == address {
                tx.amount
            } else {
                -tx.amount
            }
        })
        .sum();
    Some(AddressData {
        balance,
        transactions,
    })
}

pub fn find_block<'a>(chain: &'a [Block], hash: &str) -> Option<&'a Block> {
    chain.iter().find(|block| block.hash == hash)
}

pub fn find_transaction<'a>(
    chain: &'a [Block],
    transaction_id: &str,
) -> Option<TransactionLocation<'a>> {
    chain.iter().find_map(|block| {
        block
            .transactions
            .iter()
            .find(|tx| tx.transaction_id == transaction_id)
            .map(|transaction| TransactionLocation { block, transaction })
    })
}

/// Check that `address` can spend `amount` out of its committed balance.
/// The mint address always can.
pub fn check_balance(chain: &[Block], address: &str, amount: f64) -> CoreResult<()> {
    if address == MINT_ADDRESS {
        return Ok(());
    }
    match lookup_address(chain, address) {
        Some(AddressData { balance, .. }) if balance - amount < 0.0 => {
            Err(CoreError::InsufficientBalance { balance })
        }
        Some(_) => Ok(()),
        None => Err(CoreError::AddressNotFound {
            address: address.to_string(),
        }),
    }
}
