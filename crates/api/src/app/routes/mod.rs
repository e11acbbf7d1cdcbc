use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod system;
pub mod transactions;

/// Endpoints reachable without a session token.
pub fn public_router() -> Router {
    Router::new().route("/api/login", post(auth::login))
}

/// Endpoints that require a validated session token.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/whoami", get(system::whoami))
        .route("/api/transactions", get(transactions::list))
}
