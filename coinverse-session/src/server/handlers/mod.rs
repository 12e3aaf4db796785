mod auth;
mod books;
mod transactions;

pub use auth::{change_password, login, logout, profile, refresh_token, register};
pub use books::{book_detail, create_book, list_books, remove_book};
pub use transactions::{add_income, add_outcome};

use crate::server::{error::LedgerError, models::HealthResponse, models::Reply};
use axum::Json;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn rejected<T: Default>(operation: &'static str, code: Option<i64>, error: LedgerError) -> Reply<T> {
    tracing::warn!(operation, ?code, error = %error, "Request rejected");
    Reply::failed(code, error.to_string())
}
