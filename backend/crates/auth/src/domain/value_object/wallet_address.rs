//! Wallet Address Value Object
//!
//! An Ethereum account address, stored and compared in lowercase.
//!
//! Accepted input: 40 hex digits, optionally `0x`-prefixed. All-lowercase and
//! all-uppercase forms are taken as-is; mixed case must be a valid EIP-55
//! checksum.

use std::fmt;

use alloy::primitives::Address;
use serde::Serialize;

use crate::error::{AuthError, AuthResult};

const ADDRESS_HEX_LEN: usize = 40;

/// Lowercased `0x`-prefixed address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate and normalize user input
    pub fn parse(input: &str) -> AuthResult<Self> {
        let input = input.trim();
        let hex_part = input.strip_prefix("0x").unwrap_or(input);

        if hex_part.len() != ADDRESS_HEX_LEN || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AuthError::InvalidAddress);
        }

        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

        if has_lower && has_upper {
            let prefixed = format!("0x{hex_part}");
            Address::parse_checksummed(&prefixed, None).map_err(|_| AuthError::InvalidAddress)?;
        }

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    /// Restore from a trusted database value
    pub fn from_db(value: String) -> Self {
        Self(value.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(format!("0x{}", alloy::hex::encode(address.as_slice())))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vector
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_parse_lowercases() {
        let address = WalletAddress::parse(CHECKSUMMED).unwrap();
        assert_eq!(address.as_str(), "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }

    #[test]
    fn test_parse_single_case_and_unprefixed() {
        let lower = WalletAddress::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let upper = WalletAddress::parse("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        let bare = WalletAddress::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        // Last character case flipped
        let result = WalletAddress::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD");
        assert!(matches!(result, Err(AuthError::InvalidAddress)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "0x",
            "0x1234",
            "0xZZaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed00",
            "not-an-address",
        ] {
            assert!(
                matches!(WalletAddress::parse(input), Err(AuthError::InvalidAddress)),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_from_alloy_address() {
        let address: Address = CHECKSUMMED.parse().unwrap();
        assert_eq!(
            WalletAddress::from(address),
            WalletAddress::parse(CHECKSUMMED).unwrap()
        );
    }
}
