//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Wallet sign-in: the client signs a challenge with its wallet key and the
//!   server recovers the EIP-191 signer
//! - Stateless HS256 session token and CSRF token, each as an HttpOnly cookie
//!   plus a client-readable mirror
//! - Double-submit CSRF guard over state-changing requests
//!
//! ## Security Model
//! - Addresses are stored lowercased; mixed-case input must carry a valid checksum
//! - The user's nonce rotates on every verification attempt
//! - Unknown wallets are provisioned at sign-in unless `auto_provision_users` is off

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, ChallengePolicy, MAX_SESSION_TTL};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::user::User;
    pub use crate::domain::value_object::{
        nonce::Nonce, wallet_address::WalletAddress, wallet_signature::WalletSignature,
    };
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
