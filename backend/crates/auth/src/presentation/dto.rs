//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Nonce
// ============================================================================

/// Nonce response
#[derive(Debug, Clone, Serialize)]
pub struct NonceResponse {
    /// Message the wallet must sign
    pub message: String,
    pub nonce: String,
}

// ============================================================================
// Verify
// ============================================================================

/// Verify request
///
/// Missing fields default to empty so they fail validation with 400/401
/// instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub signature: String,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Lowercased wallet address
    pub address: String,
    pub is_admin: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            address: user.wallet_address.to_string(),
            is_admin: user.is_admin,
        }
    }
}

/// Verify response
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserResponse,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}
