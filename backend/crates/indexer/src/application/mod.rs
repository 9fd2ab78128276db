//! Application Layer
//!
//! Indexer configuration, log handling and the listener task.

pub mod config;
pub mod event_indexer;
pub mod list_transactions;
pub mod listener;

pub use config::IndexerConfig;
pub use event_indexer::{EventIndexer, LogOutcome};
pub use list_transactions::ListTransactionsUseCase;
pub use listener::ChainListener;
