use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::error::CoreError;

#[derive(Serialize)]
struct ErrorResponse<'a> {
    note: String,
    error: &'a CoreError,
}

impl ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InsufficientBalance { .. }
            | CoreError::AddressNotFound { .. }
            | CoreError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            e if e.is_integrity_failure() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            note: self.to_string(),
            error: self,
        })
    }
}
