mod api;
mod blockchain;
mod config;
mod error;
mod node;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let cfg = NodeConfig::from_env();
    let (host, port) = (cfg.host.clone(), cfg.port);

    info!(
        "⛓️ Starting ledger node at http://{host}:{port} (reward address {}, nonce bound {})",
        cfg.node_address, cfg.max_nonce
    );

    let state = web::Data::new(AppState::new(cfg));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
