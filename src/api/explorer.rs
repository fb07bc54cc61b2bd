use actix_web::{HttpResponse, Responder, get, web};

use super::models::{
    AddressData, AddressResponse, AppState, BlockResponse, NotFoundResponse, TransactionResponse,
};

#[get("/block/{hash}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let hash = path.into_inner().0;
    match state.node.lookup_block(&hash) {
        Some(block) => HttpResponse::Ok().json(BlockResponse { block }),
        None => HttpResponse::NotFound().json(NotFoundResponse {
            note: "Block not found by block hash",
        }),
    }
}

#[get("/transaction/{id}/")]
pub async fn get_transaction(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> impl Responder {
    let id = path.into_inner().0;
    match state.node.lookup_transaction(&id) {
        Some((block, transaction)) => {
            HttpResponse::Ok().json(TransactionResponse { transaction, block })
        }
        None => HttpResponse::NotFound().json(NotFoundResponse {
            note: "Transaction not found by transaction id",
        }),
    }
}

#[get("/address/{address}/")]
pub async fn get_address(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> impl Responder {
    let address = path.into_inner().0;
    match state.node.lookup_address(&address) {
        Some(data) => HttpResponse::Ok().json(AddressResponse {
            address_data: AddressData {
                address_transactions: data.transactions,
                address_balance: data.balance,
            },
        }),
        None => HttpResponse::NotFound().json(NotFoundResponse {
            note: "Address not found by id",
        }),
    }
}
