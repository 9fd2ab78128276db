//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/nonce/{address}", get(handlers::get_nonce::<R>))
        .route("/verify", post(handlers::verify::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/session", get(handlers::session_status::<R>))
        .with_state(state)
}
