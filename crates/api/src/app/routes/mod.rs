use axum::{
    Router,
    routing::{get, post},
};

pub mod accounts;
pub mod auth;
pub mod bills;
pub mod system;

/// Routes reachable without a credential: registration and login.
pub fn public_router() -> Router {
    Router::new()
        .route("/accounts", post(accounts::create_account))
        .route("/auth/login", post(auth::login))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route(
            "/accounts",
            get(accounts::list_accounts),
        )
        .route(
            "/accounts/:email",
            axum::routing::put(accounts::update_account).delete(accounts::delete_account),
        )
        .nest("/bills", bills::router())
}
