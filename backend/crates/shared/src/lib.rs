//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - The unified [`error::app_error::AppError`] and its HTTP mapping
//! - Typed ID wrappers
//! - The authenticated [`principal::Principal`] handed from auth middleware to handlers
//!
//! Anything domain specific (wallets, chain events) lives in its own crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod principal;
