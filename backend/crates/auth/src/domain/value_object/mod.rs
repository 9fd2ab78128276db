//! Value Object Module

pub mod nonce;
pub mod wallet_address;
pub mod wallet_signature;
