use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{
    AppState, BlockchainResponse, ConsensusRequest, ConsensusResponse, ReceiveBlockRequest,
    ReceiveBlockResponse, ValidateResponse,
};
use crate::error::CoreError;

/// The full node view: chain plus pending pool. Peers read this for consensus.
#[get("/blockchain/")]
pub async fn get_blockchain(state: web::Data<AppState>) -> impl Responder {
    let view = state.node.export();
    HttpResponse::Ok().json(BlockchainResponse {
        length: view.chain.len(),
        node_address: &state.config.node_address,
        chain: view.chain,
        pending_transactions: view.pending_transactions,
    })
}

/// Validate the local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    let result = crate::blockchain::validate_chain(&chain);
    HttpResponse::Ok().json(ValidateResponse {
        valid: result.is_ok(),
        length: chain.len(),
        error: result.err(),
    })
}

/// Accept a block a peer just mined on top of our tip.
#[post("/receive-new-block/")]
pub async fn receive_new_block(
    state: web::Data<AppState>,
    body: web::Json<ReceiveBlockRequest>,
) -> Result<HttpResponse, CoreError> {
    let block = body.into_inner().new_block;
    state.node.receive_block(block.clone())?;
    Ok(HttpResponse::Ok().json(ReceiveBlockResponse {
        note: "New block received and accepted.",
        new_block: block,
    }))
}

/// Longest-chain resolution against the peer views in the body.
#[post("/consensus/")]
pub async fn consensus(
    state: web::Data<AppState>,
    body: web::Json<ConsensusRequest>,
) -> impl Responder {
    let candidates = body.into_inner().candidates;
    info!("POST /consensus/ - {} candidates", candidates.len());

    let (replaced, view) = state.node.resolve(candidates);
    HttpResponse::Ok().json(ConsensusResponse {
        note: if replaced {
            "This chain has been replaced."
        } else {
            "Current chain has not been replaced."
        },
        replaced,
        chain: view.chain,
        pending_transactions: view.pending_transactions,
    })
}
