//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Query, State};
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::ListTransactionsUseCase;
use crate::domain::repository::TransactionRepository;
use crate::error::IndexerResult;
use crate::presentation::dto::{ListTransactionsQuery, TransactionResponse, TransactionsResponse};

/// Shared state for transaction handlers
#[derive(Clone)]
pub struct TransactionsAppState<T>
where
    T: TransactionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<T>,
}

/// GET /api/transactions
///
/// Requires the principal inserted by the auth middleware.
pub async fn list_transactions<T>(
    State(state): State<TransactionsAppState<T>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListTransactionsQuery>,
) -> IndexerResult<Json<TransactionsResponse>>
where
    T: TransactionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListTransactionsUseCase::new(state.repo.clone());
    let transactions = use_case
        .execute(&principal.wallet_address, query.limit)
        .await?;

    tracing::debug!(
        user = %principal.wallet_address,
        count = transactions.len(),
        "Listed transactions"
    );

    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().map(TransactionResponse::from).collect(),
    }))
}
