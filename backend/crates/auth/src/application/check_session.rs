//! Check Session Use Case
//!
//! Verifies the session token and resolves the signed-in user.

use std::str::FromStr;
use std::sync::Arc;

use kernel::id::UserId;
use kernel::principal::Principal;
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::session::SessionClaims;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CheckSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Load the user behind a token
    pub async fn execute(&self, token: &str) -> AuthResult<User> {
        let principal = verify_token(&self.config, token)?;

        self.user_repo
            .find_by_id(&principal.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

/// Verify signature and expiry without touching the database
pub fn verify_token(config: &AuthConfig, token: &str) -> AuthResult<Principal> {
    let now = chrono::Utc::now().timestamp();
    let claims: SessionClaims = TokenSigner::new(config.jwt_secret.clone()).decode(token, now)?;

    let user_id = UserId::from_str(&claims.id).map_err(|_| AuthError::InvalidToken)?;

    Ok(Principal::new(user_id, claims.wallet_address))
}
