//! Domain Layer
//!
//! Transaction records, contract event bindings and repository traits.

pub mod chain;
pub mod entities;
pub mod events;
pub mod repository;

pub use chain::LogSource;
pub use entities::{NewTransaction, Transaction, TransactionKind};
pub use events::{EventData, StakingEvent};
pub use repository::{SyncStateRepository, TransactionRepository};
