//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random tokens)
//! - HS256 session tokens
//! - Cookie management
//! - Client identification
//! - Rate limiting infrastructure

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod rate_limit;
pub mod token;
