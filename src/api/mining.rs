use actix_web::{HttpResponse, get, web};
use log::info;
use std::time::Instant;

use super::models::{AppState, MineResponse};
use crate::error::CoreError;

/// Mine the pending pool into a new block. The nonce search runs on the
/// blocking pool so other requests keep being served.
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, CoreError> {
    let t0 = Instant::now();
    let worker = state.clone();
    let block = web::block(move || worker.node.mine())
        .await
        .map_err(|e| CoreError::unexpected(format!("mining worker failed: {e}")))??;

    info!(
        "GET /mine/ - block #{} sealed in {} ms (nonce={})",
        block.index,
        t0.elapsed().as_millis(),
        block.nonce
    );
    Ok(HttpResponse::Ok().json(MineResponse {
        note: "New block mined successfully",
        block,
    }))
}
