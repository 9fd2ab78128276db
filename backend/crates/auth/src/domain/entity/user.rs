//! User Entity
//!
//! A wallet that has requested a nonce or signed in at least once.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique identity key (lowercased)
    pub wallet_address: WalletAddress,
    /// Current challenge nonce
    pub nonce: Nonce,
    pub last_sign_in: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh nonce
    pub fn new(wallet_address: WalletAddress) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            wallet_address,
            nonce: Nonce::generate(),
            last_sign_in: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the nonce so a captured signature cannot be replayed
    pub fn rotate_nonce(&mut self) {
        self.nonce = Nonce::generate();
        self.updated_at = Utc::now();
    }

    /// Record a successful sign-in
    pub fn record_sign_in(&mut self) {
        let now = Utc::now();
        self.last_sign_in = Some(now);
        self.updated_at = now;
    }
}
