//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Returns `false` if the wallet address already exists.
    async fn create(&self, user: &User) -> AuthResult<bool>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by (lowercased) wallet address
    async fn find_by_wallet_address(&self, address: &WalletAddress) -> AuthResult<Option<User>>;

    /// Persist nonce, sign-in time and role
    async fn update(&self, user: &User) -> AuthResult<()>;
}
