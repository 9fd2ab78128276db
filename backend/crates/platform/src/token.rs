//! HS256 Bearer Tokens
//!
//! Compact JWS (`header.payload.signature`) signed with HMAC-SHA256.
//! Only `HS256` is accepted on decode; any other `alg` is rejected.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::crypto::{from_base64url, hmac_sha256, hmac_sha256_verify, to_base64url};

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("Invalid token signature")]
    BadSignature,
    #[error("Token expired")]
    Expired,
    #[error("Token claims could not be encoded: {0}")]
    Encode(String),
    #[error("Signing key rejected")]
    InvalidKey,
}

/// Signs and verifies HS256 tokens with one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign `claims` into a compact token
    pub fn encode<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims).map_err(|e| TokenError::Encode(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            to_base64url(HEADER_JSON.as_bytes()),
            to_base64url(&payload)
        );
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes())
            .map_err(|_| TokenError::InvalidKey)?;

        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Verify signature and `exp` (seconds since epoch), then parse claims
    pub fn decode<C: DeserializeOwned>(&self, token: &str, now_secs: i64) -> Result<C, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: serde_json::Value = from_base64url(header_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(TokenError::Malformed)?;

        if header.get("alg").and_then(|alg| alg.as_str()) != Some("HS256") {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let signature = from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;
        let signing_input_len = header_b64.len() + 1 + payload_b64.len();
        let valid = hmac_sha256_verify(
            &self.secret,
            &token.as_bytes()[..signing_input_len],
            &signature,
        )
        .map_err(|_| TokenError::InvalidKey)?;
        if !valid {
            return Err(TokenError::BadSignature);
        }

        let payload = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        let value: serde_json::Value =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if let Some(exp) = value.get("exp") {
            let exp = exp.as_i64().ok_or(TokenError::Malformed)?;
            if now_secs >= exp {
                return Err(TokenError::Expired);
            }
        }

        serde_json::from_value(value).map_err(|_| TokenError::Malformed)
    }
}
