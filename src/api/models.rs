use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, NodeChain};
use crate::config::NodeConfig;
use crate::error::CoreError;
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: the node service and its settings.
pub struct AppState {
    pub node: Node,
    pub config: NodeConfig,
}

impl AppState {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            node: Node::from_config(&config),
            config,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainResponse<'a> {
    pub length: usize,
    pub node_address: &'a str,
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CoreError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveBlockRequest {
    pub new_block: Block,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveBlockResponse {
    pub note: &'static str,
    pub new_block: Block,
}

#[derive(Deserialize)]
pub struct ConsensusRequest {
    /// Node views reported by peers, in the order they answered.
    pub candidates: Vec<NodeChain>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResponse {
    pub note: &'static str,
    pub replaced: bool,
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub note: &'static str,
    pub block: Block,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub amount: f64,
    pub sender: String,
    pub recipient: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTxResponse {
    pub note: String,
    pub transaction: Transaction,
    pub block_index: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmitTxResponse {
    pub note: String,
    pub block_index: u64,
}

/* ---------- Explorer API Models ---------- */

#[derive(Serialize)]
pub struct NotFoundResponse {
    pub note: &'static str,
}

#[derive(Serialize)]
pub struct BlockResponse {
    pub block: Block,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
    pub block: Block,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub address_transactions: Vec<Transaction>,
    pub address_balance: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub address_data: AddressData,
}
