//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::{NewTransaction, Transaction};
use crate::error::IndexerResult;

/// Transaction repository trait
#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    /// Insert a record. Returns false when the tx hash is already stored.
    async fn insert(&self, tx: &NewTransaction) -> IndexerResult<bool>;

    /// Transactions for a lowercased user address, newest block first
    async fn find_by_user(&self, user_address: &str, limit: i64) -> IndexerResult<Vec<Transaction>>;
}

/// Block cursor repository trait
#[trait_variant::make(SyncStateRepository: Send)]
pub trait LocalSyncStateRepository {
    /// Last fully processed block for a contract, if any
    async fn load_cursor(&self, contract: &str) -> IndexerResult<Option<u64>>;

    /// Move the cursor forward. Never moves it backwards.
    async fn save_cursor(&self, contract: &str, block: u64) -> IndexerResult<()>;
}
