use actix_web::{HttpResponse, post, web};
use log::{debug, info, warn};

use super::models::{AdmitTxResponse, AppState, NewTxRequest, NewTxResponse};
use crate::error::CoreError;
use crate::transaction::Transaction;

/// Admit a transaction created elsewhere (usually relayed by a peer).
#[post("/transaction/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> Result<HttpResponse, CoreError> {
    let tx = body.into_inner();
    debug!(
        "POST /transaction/ - received {} ({} -> {}, amount={})",
        tx.transaction_id, tx.sender, tx.recipient, tx.amount
    );

    let block_index = state.node.admit_transaction(tx).inspect_err(|e| {
        warn!("POST /transaction/ - rejected: {e}");
    })?;

    Ok(HttpResponse::Ok().json(AdmitTxResponse {
        note: format!("Transaction will be added in block {block_index}."),
        block_index,
    }))
}

/// Create a new transaction and queue it locally. Relaying it to peers is
/// the caller's job.
#[post("/transaction/broadcast/")]
pub async fn broadcast_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, CoreError> {
    let req = body.into_inner();

    let transaction = state
        .node
        .create_transaction(req.amount, &req.sender, &req.recipient)
        .inspect_err(|e| warn!("POST /transaction/broadcast/ - rejected: {e}"))?;
    let block_index = state.node.admit_transaction(transaction.clone())?;

    info!(
        "POST /transaction/broadcast/ - tx {} queued for block {}",
        transaction.transaction_id, block_index
    );
    Ok(HttpResponse::Ok().json(NewTxResponse {
        note: format!("Transaction created and will be added in block {block_index}."),
        transaction,
        block_index,
    }))
}
