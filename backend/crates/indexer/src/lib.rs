//! Indexer Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Transaction records, contract event bindings, repository traits
//! - `application/` - Log handling, reconciliation, the listener task
//! - `infra/` - PostgreSQL and websocket chain implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Indexed Events
//! `Staked`, `Unstaked`, `ClaimedRewards` and `TokensTransferredCrossChain`
//! on one staking contract, stored as `STAKE`, `UNSTAKE`, `CLAIM_REWARDS` and
//! `BRIDGE` rows of the `transactions` table.
//!
//! ## Delivery Model
//! - At most one row per transaction hash; duplicates are ignored
//! - A failed insert is logged and the event dropped
//! - A persisted block cursor lets each (re)connection replay missed blocks

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{ChainListener, EventIndexer, IndexerConfig};
pub use error::{IndexerError, IndexerResult};
pub use infra::postgres::PgIndexerRepository;
pub use presentation::router::transactions_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::events::{EventData, StakingEvent};
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
