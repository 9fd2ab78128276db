//! Presentation Layer
//!
//! HTTP handlers, DTOs and router for indexed transactions.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::TransactionsAppState;
pub use router::{transactions_router, transactions_router_generic};
