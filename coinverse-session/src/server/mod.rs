pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Configuration;
pub use error::LedgerError;

use axum::{
    routing::{get, post, put},
    Router,
};
use services::Ledger;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

impl AppState {
    pub fn new(configuration: &Configuration) -> Self {
        Self {
            ledger: Arc::new(Ledger::new(configuration.server.token_ttl_seconds)),
        }
    }
}

/// Every CoinVerse endpoint plus `/health`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh_token", post(handlers::refresh_token))
        .route("/logout", post(handlers::logout))
        .route("/users/me", get(handlers::profile).post(handlers::profile))
        .route("/users/me/change_password", put(handlers::change_password))
        .route("/create_book", post(handlers::create_book))
        .route("/list_books", put(handlers::list_books))
        .route("/books/remove_book", post(handlers::remove_book))
        .route("/books_detail", post(handlers::book_detail))
        .route("/book/transactions/add_income", post(handlers::add_income))
        .route("/book/transactions/add_outcome", post(handlers::add_outcome));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest(&format!("/{}", coinverse_api::API_PREFIX), api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
