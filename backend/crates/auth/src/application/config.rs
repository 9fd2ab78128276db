//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::str::FromStr;
use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Fixed challenge every wallet signs
pub const FIXED_CHALLENGE: &str = "Sign this message to authenticate with our dApp";

/// Upper bound accepted for `session_ttl`
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Which message a wallet must sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengePolicy {
    /// One constant message for everyone
    #[default]
    Fixed,
    /// Message embeds the user's current nonce
    Nonce,
}

impl ChallengePolicy {
    /// Build the message to sign
    pub fn message(&self, nonce: &str) -> String {
        match self {
            ChallengePolicy::Fixed => FIXED_CHALLENGE.to_string(),
            ChallengePolicy::Nonce => format!(
                "Welcome to StakingIt!\n\nPlease sign this message to authenticate.\nNonce: {nonce}\nThis signature will not trigger a blockchain transaction or cost any gas fees."
            ),
        }
    }
}

impl FromStr for ChallengePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(ChallengePolicy::Fixed),
            "nonce" => Ok(ChallengePolicy::Nonce),
            other => Err(format!("unknown challenge policy: {other}")),
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 key for session tokens
    pub jwt_secret: Vec<u8>,
    /// Token lifetime and cookie Max-Age (7 days)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    pub challenge: ChallengePolicy,
    /// Create users for unknown wallets at verification instead of 404
    pub auto_provision_users: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            challenge: ChallengePolicy::Fixed,
            auto_provision_users: true,
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in seconds, capped at [`MAX_SESSION_TTL`]
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.min(MAX_SESSION_TTL).as_secs() as i64
    }
}
