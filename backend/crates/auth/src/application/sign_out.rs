//! Sign Out Use Case
//!
//! Sessions are stateless, so signing out only expires the cookies.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionCookies;

/// Sign out use case
pub struct SignOutUseCase {
    config: Arc<AuthConfig>,
}

impl SignOutUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// `Set-Cookie` directives clearing all session cookies
    pub fn execute(&self) -> [String; 4] {
        tracing::info!("User signed out");
        SessionCookies::clear_directives(&self.config)
    }
}
