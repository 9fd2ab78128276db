//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Transaction, TransactionKind};

/// Query string of `GET /api/transactions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTransactionsQuery {
    pub limit: Option<i64>,
}

/// One indexed transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(rename = "type")]
    pub tx_type: TransactionKind,
    pub user_address: String,
    pub token_address: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_chain_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_fee: Option<String>,
    pub tx_hash: String,
    pub block_number: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        let record = tx.record;
        Self {
            tx_type: record.tx_type,
            user_address: record.user_address,
            token_address: record.token_address,
            amount: record.amount,
            stake_id: record.stake_id,
            duration: record.duration,
            early: record.early,
            message_id: record.message_id,
            destination_chain_selector: record.destination_chain_selector,
            native_token: record.native_token,
            native_fee: record.native_fee,
            tx_hash: record.tx_hash,
            block_number: record.block_number,
            created_at: tx.created_at,
        }
    }
}

/// Transactions list response
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionResponse>,
}
