//! Transactions Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::repository::TransactionRepository;
use crate::infra::postgres::PgIndexerRepository;
use crate::presentation::handlers::{self, TransactionsAppState};

/// Create the transactions router with PostgreSQL repository.
///
/// The caller must layer `auth::require_auth` over it.
pub fn transactions_router(repo: PgIndexerRepository) -> Router {
    transactions_router_generic(repo)
}

/// Create a generic transactions router for any repository implementation
pub fn transactions_router_generic<T>(repo: T) -> Router
where
    T: TransactionRepository + Clone + Send + Sync + 'static,
{
    let state = TransactionsAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/", get(handlers::list_transactions::<T>))
        .with_state(state)
}
