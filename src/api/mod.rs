mod chain;
mod error;
mod explorer;
mod health;
mod mining;
pub mod models;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

/// Peer chains arrive whole in request bodies.
const MAX_JSON_BYTES: usize = 16 * 1024 * 1024;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_JSON_BYTES));
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_blockchain)
            .service(chain::validate_chain)
            .service(chain::receive_new_block)
            .service(chain::consensus)
            .service(mining::mine_block)
            .service(tx::post_transaction)
            .service(tx::broadcast_transaction)
            .service(explorer::get_block)
            .service(explorer::get_transaction)
            .service(explorer::get_address),
    );
}
