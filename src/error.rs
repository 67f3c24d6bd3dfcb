//! Service-wide error type

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("product not found")]
    ProductNotFound,

    #[error("order not found")]
    OrderNotFound,

    #[error("invalid sale: {0}")]
    InvalidSale(String),

    #[error("invalid quantity")]
    InvalidQuantity,

    #[error("cart is empty")]
    EmptyCart,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("data integrity: {0}")]
    Integrity(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::ProductNotFound | StoreError::OrderNotFound => StatusCode::NOT_FOUND,
            StoreError::InvalidSale(_)
            | StoreError::InvalidQuantity
            | StoreError::EmptyCart
            | StoreError::UnknownCategory(_)
            | StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Integrity(_) | StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
