//! List Transactions Use Case

use std::sync::Arc;

use crate::domain::entities::Transaction;
use crate::domain::repository::TransactionRepository;
use crate::error::IndexerResult;

/// Page size when the caller gives none
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page a caller may request
pub const MAX_LIMIT: i64 = 200;

/// Reads the indexed transactions of one wallet
pub struct ListTransactionsUseCase<T>
where
    T: TransactionRepository,
{
    transactions: Arc<T>,
}

impl<T> ListTransactionsUseCase<T>
where
    T: TransactionRepository,
{
    pub fn new(transactions: Arc<T>) -> Self {
        Self { transactions }
    }

    /// Newest block first, at most `limit` rows (clamped to `1..=MAX_LIMIT`)
    pub async fn execute(
        &self,
        wallet_address: &str,
        limit: Option<i64>,
    ) -> IndexerResult<Vec<Transaction>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let address = wallet_address.to_ascii_lowercase();

        self.transactions.find_by_user(&address, limit).await
    }
}
