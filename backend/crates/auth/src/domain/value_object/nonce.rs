//! Nonce Value Object

use std::fmt;

use platform::crypto::random_hex_token;

/// Random bytes behind each nonce
const NONCE_BYTES: usize = 16;

/// Single-use value bound to a user, replaced after every verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn generate() -> Self {
        Self(random_hex_token(NONCE_BYTES))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_fresh() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_eq!(a.as_str().len(), NONCE_BYTES * 2);
        assert_ne!(a, b);
    }
}
