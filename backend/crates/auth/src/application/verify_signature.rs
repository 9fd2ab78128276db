//! Verify Signature Use Case
//!
//! Authenticates a wallet by recovering the signer of the challenge message
//! and issues a session on match.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{IssueSessionUseCase, SessionCookies};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    wallet_address::WalletAddress, wallet_signature::WalletSignature,
};
use crate::error::{AuthError, AuthResult};

/// Verify signature input
pub struct VerifySignatureInput {
    pub address: String,
    /// `0x`-prefixed 65-byte signature
    pub signature: String,
}

/// Verify signature output
pub struct VerifySignatureOutput {
    pub user: User,
    pub session: SessionCookies,
}

/// Verify signature use case
pub struct VerifySignatureUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> VerifySignatureUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: VerifySignatureInput) -> AuthResult<VerifySignatureOutput> {
        // Malformed signatures are rejected before the address is looked at
        let signature = WalletSignature::parse(&input.signature)?;
        // No signature can match an address that does not parse
        let wallet_address =
            WalletAddress::parse(&input.address).map_err(|_| AuthError::InvalidSignature)?;

        let mut user = self.load_or_provision(wallet_address).await?;

        let message = self.config.challenge.message(user.nonce.as_str());
        let signer_matches = signature
            .recover_signer(&message)
            .is_ok_and(|signer| signer == user.wallet_address);

        user.rotate_nonce();

        if !signer_matches {
            self.user_repo.update(&user).await?;
            tracing::warn!(wallet = %user.wallet_address, "Signature does not match wallet");
            return Err(AuthError::InvalidSignature);
        }

        user.record_sign_in();
        self.user_repo.update(&user).await?;

        let session = IssueSessionUseCase::new(self.config.clone()).execute(&user)?;

        tracing::info!(
            user_id = %user.user_id,
            wallet = %user.wallet_address,
            "Wallet signed in"
        );

        Ok(VerifySignatureOutput { user, session })
    }

    async fn load_or_provision(&self, wallet_address: WalletAddress) -> AuthResult<User> {
        if let Some(user) = self.user_repo.find_by_wallet_address(&wallet_address).await? {
            return Ok(user);
        }

        if !self.config.auto_provision_users {
            return Err(AuthError::UserNotFound);
        }

        let user = User::new(wallet_address);
        if self.user_repo.create(&user).await? {
            tracing::info!(wallet = %user.wallet_address, "Provisioned wallet at sign-in");
            return Ok(user);
        }

        self.user_repo
            .find_by_wallet_address(&user.wallet_address)
            .await?
            .ok_or_else(|| AuthError::Internal("User vanished after conflict".to_string()))
    }
}
