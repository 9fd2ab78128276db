//! Issue Nonce Use Case
//!
//! Finds or creates the user for an address and rotates its nonce.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult};

/// Issue nonce output
pub struct IssueNonceOutput {
    /// Message the wallet must sign
    pub message: String,
    pub nonce: String,
}

/// Issue nonce use case
pub struct IssueNonceUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> IssueNonceUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, address: &str) -> AuthResult<IssueNonceOutput> {
        let wallet_address = WalletAddress::parse(address)?;

        let user = match self.user_repo.find_by_wallet_address(&wallet_address).await? {
            Some(mut user) => {
                user.rotate_nonce();
                self.user_repo.update(&user).await?;
                user
            }
            None => self.create_user(wallet_address).await?,
        };

        tracing::debug!(wallet = %user.wallet_address, "Issued nonce");

        Ok(IssueNonceOutput {
            message: self.config.challenge.message(user.nonce.as_str()),
            nonce: user.nonce.to_string(),
        })
    }

    async fn create_user(&self, wallet_address: WalletAddress) -> AuthResult<User> {
        let user = User::new(wallet_address);

        if self.user_repo.create(&user).await? {
            tracing::info!(wallet = %user.wallet_address, "Registered new wallet");
            return Ok(user);
        }

        // Lost a race with a concurrent request for the same address
        let mut existing = self
            .user_repo
            .find_by_wallet_address(&user.wallet_address)
            .await?
            .ok_or_else(|| AuthError::Internal("User vanished after conflict".to_string()))?;
        existing.rotate_nonce();
        self.user_repo.update(&existing).await?;
        Ok(existing)
    }
}
