//! Infrastructure Layer
//!
//! PostgreSQL persistence and the websocket chain client.

pub mod chain;
pub mod postgres;

pub use chain::ChainClient;
pub use postgres::PgIndexerRepository;
