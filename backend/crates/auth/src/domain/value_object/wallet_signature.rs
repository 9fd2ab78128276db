//! Wallet Signature Value Object
//!
//! A 65-byte `r || s || v` ECDSA signature produced by `personal_sign`.

use alloy::primitives::{Address, Signature};

use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult};

const SIGNATURE_LEN: usize = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(Signature);

impl WalletSignature {
    /// Decode `0x`-prefixed (or bare) hex
    pub fn parse(input: &str) -> AuthResult<Self> {
        let bytes = alloy::hex::decode(input.trim()).map_err(|_| AuthError::InvalidSignature)?;

        if bytes.len() != SIGNATURE_LEN {
            return Err(AuthError::InvalidSignature);
        }

        Signature::from_raw(&bytes)
            .map(Self)
            .map_err(|_| AuthError::InvalidSignature)
    }

    /// Recover the EIP-191 signer of `message`
    pub fn recover_signer(&self, message: &str) -> AuthResult<WalletAddress> {
        let address: Address = self
            .0
            .recover_address_from_msg(message.as_bytes())
            .map_err(|_| AuthError::InvalidSignature)?;

        Ok(WalletAddress::from(address))
    }
}
