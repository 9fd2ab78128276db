//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod issue_nonce;
pub mod session;
pub mod sign_out;
pub mod verify_signature;

// Re-exports
pub use check_session::{CheckSessionUseCase, verify_token};
pub use config::{AuthConfig, ChallengePolicy};
pub use issue_nonce::{IssueNonceOutput, IssueNonceUseCase};
pub use session::{IssueSessionUseCase, SessionClaims, SessionCookies};
pub use sign_out::SignOutUseCase;
pub use verify_signature::{VerifySignatureInput, VerifySignatureOutput, VerifySignatureUseCase};
