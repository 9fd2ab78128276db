//! Session Issuance
//!
//! A session is a stateless HS256 token plus a random CSRF token. Each is
//! delivered twice: an HttpOnly cookie the server reads and a readable
//! mirror the browser app uses to know it is signed in.

use std::sync::Arc;

use platform::cookie::CookieConfig;
use platform::crypto::random_hex_token;
use platform::token::TokenSigner;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::error::AuthResult;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
pub const AUTH_TOKEN_CLIENT_COOKIE: &str = "auth_token_client";
pub const CSRF_TOKEN_COOKIE: &str = "csrf_token";
pub const CSRF_TOKEN_CLIENT_COOKIE: &str = "csrf_token_client";

/// Random bytes behind each CSRF token
const CSRF_TOKEN_BYTES: usize = 32;

/// Bearer token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// User ID (UUID string)
    pub id: String,
    pub wallet_address: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token pair for one session, rendered as four `Set-Cookie` directives
#[derive(Debug, Clone)]
pub struct SessionCookies {
    pub auth_token: String,
    pub csrf_token: String,
}

impl SessionCookies {
    /// `auth_token`, `auth_token_client`, `csrf_token`, `csrf_token_client`
    pub fn set_cookie_directives(&self, config: &AuthConfig) -> [String; 4] {
        let max_age = config.session_ttl_secs();

        [
            cookie(config, AUTH_TOKEN_COOKIE, true)
                .max_age_secs(max_age)
                .build_set_cookie(&self.auth_token),
            cookie(config, AUTH_TOKEN_CLIENT_COOKIE, false)
                .max_age_secs(max_age)
                .build_set_cookie(&self.auth_token),
            cookie(config, CSRF_TOKEN_COOKIE, true)
                .max_age_secs(max_age)
                .build_set_cookie(&self.csrf_token),
            cookie(config, CSRF_TOKEN_CLIENT_COOKIE, false)
                .max_age_secs(max_age)
                .build_set_cookie(&self.csrf_token),
        ]
    }

    /// Expire all four cookies
    pub fn clear_directives(config: &AuthConfig) -> [String; 4] {
        [
            cookie(config, AUTH_TOKEN_COOKIE, true).build_delete_cookie(),
            cookie(config, AUTH_TOKEN_CLIENT_COOKIE, false).build_delete_cookie(),
            cookie(config, CSRF_TOKEN_COOKIE, true).build_delete_cookie(),
            cookie(config, CSRF_TOKEN_CLIENT_COOKIE, false).build_delete_cookie(),
        ]
    }
}

fn cookie(config: &AuthConfig, name: &str, http_only: bool) -> CookieConfig {
    CookieConfig::named(name)
        .http_only(http_only)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
}

/// Issue session use case
pub struct IssueSessionUseCase {
    config: Arc<AuthConfig>,
}

impl IssueSessionUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, user: &User) -> AuthResult<SessionCookies> {
        let now = chrono::Utc::now().timestamp();

        let claims = SessionClaims {
            id: user.user_id.to_string(),
            wallet_address: user.wallet_address.to_string(),
            iat: now,
            exp: now.saturating_add(self.config.session_ttl_secs()),
        };

        let auth_token = TokenSigner::new(self.config.jwt_secret.clone()).encode(&claims)?;

        Ok(SessionCookies {
            auth_token,
            csrf_token: random_hex_token(CSRF_TOKEN_BYTES),
        })
    }
}
