//! Domain Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of indexed contract action, stored as `tx_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Stake,
    Unstake,
    ClaimRewards,
    Bridge,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Stake => "STAKE",
            TransactionKind::Unstake => "UNSTAKE",
            TransactionKind::ClaimRewards => "CLAIM_REWARDS",
            TransactionKind::Bridge => "BRIDGE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STAKE" => Ok(TransactionKind::Stake),
            "UNSTAKE" => Ok(TransactionKind::Unstake),
            "CLAIM_REWARDS" => Ok(TransactionKind::ClaimRewards),
            "BRIDGE" => Ok(TransactionKind::Bridge),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

/// A decoded event ready for insertion.
///
/// Addresses and hashes are lowercased `0x` hex; integers are base-10
/// strings so uint256 values keep full precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub tx_type: TransactionKind,
    pub user_address: String,
    pub token_address: String,
    pub amount: String,
    pub stake_id: Option<String>,
    pub duration: Option<String>,
    pub early: Option<bool>,
    pub message_id: Option<String>,
    pub destination_chain_selector: Option<String>,
    pub native_token: Option<String>,
    pub native_fee: Option<String>,
    pub tx_hash: String,
    pub block_number: i64,
}

impl NewTransaction {
    /// Record with only the fields every event carries
    pub fn base(
        tx_type: TransactionKind,
        user_address: String,
        token_address: String,
        amount: String,
        tx_hash: String,
        block_number: i64,
    ) -> Self {
        Self {
            tx_type,
            user_address,
            token_address,
            amount,
            stake_id: None,
            duration: None,
            early: None,
            message_id: None,
            destination_chain_selector: None,
            native_token: None,
            native_fee: None,
            tx_hash,
            block_number,
        }
    }
}

/// A persisted transaction row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub record: NewTransaction,
    pub created_at: DateTime<Utc>,
}
