//! Authenticated caller

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Identity attached to a request once its session token has been verified.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    /// Lowercased `0x` address
    pub wallet_address: String,
}

impl Principal {
    pub fn new(user_id: UserId, wallet_address: impl Into<String>) -> Self {
        Self {
            user_id,
            wallet_address: wallet_address.into(),
        }
    }
}
