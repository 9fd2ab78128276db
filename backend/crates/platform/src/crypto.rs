//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Random token rendered as lowercase hex (`len` bytes of entropy)
pub fn random_hex_token(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Encode bytes as unpadded base64url (JWT segments)
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256 over `data`
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], InvalidLength> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn hmac_sha256_verify(key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool, InvalidLength> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.verify_slice(tag).is_ok())
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
