//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{NewTransaction, Transaction, TransactionKind};
use crate::domain::repository::{SyncStateRepository, TransactionRepository};
use crate::error::{IndexerError, IndexerResult};

/// PostgreSQL-backed indexer repository
#[derive(Clone)]
pub struct PgIndexerRepository {
    pool: PgPool,
}

impl PgIndexerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Transaction Repository Implementation
// ============================================================================

impl TransactionRepository for PgIndexerRepository {
    async fn insert(&self, tx: &NewTransaction) -> IndexerResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                tx_type,
                user_address,
                token_address,
                amount,
                stake_id,
                duration,
                early,
                message_id,
                destination_chain_selector,
                native_token,
                native_fee,
                tx_hash,
                block_number
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (tx_hash) DO NOTHING
            "#,
        )
        .bind(tx.tx_type.as_str())
        .bind(&tx.user_address)
        .bind(&tx.token_address)
        .bind(&tx.amount)
        .bind(&tx.stake_id)
        .bind(&tx.duration)
        .bind(tx.early)
        .bind(&tx.message_id)
        .bind(&tx.destination_chain_selector)
        .bind(&tx.native_token)
        .bind(&tx.native_fee)
        .bind(&tx.tx_hash)
        .bind(tx.block_number)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_user(&self, user_address: &str, limit: i64) -> IndexerResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                id,
                tx_type,
                user_address,
                token_address,
                amount,
                stake_id,
                duration,
                early,
                message_id,
                destination_chain_selector,
                native_token,
                native_fee,
                tx_hash,
                block_number,
                created_at
            FROM transactions
            WHERE user_address = $1
            ORDER BY block_number DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_address)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }
}

// ============================================================================
// Sync State Repository Implementation
// ============================================================================

impl SyncStateRepository for PgIndexerRepository {
    async fn load_cursor(&self, contract: &str) -> IndexerResult<Option<u64>> {
        let last_block: Option<i64> = sqlx::query_scalar(
            "SELECT last_block FROM indexer_sync_state WHERE contract_address = $1",
        )
        .bind(contract)
        .fetch_optional(&self.pool)
        .await?;

        Ok(last_block.map(|block| block.max(0) as u64))
    }

    async fn save_cursor(&self, contract: &str, block: u64) -> IndexerResult<()> {
        let block = i64::try_from(block)
            .map_err(|_| IndexerError::Internal(format!("block {block} out of range")))?;

        sqlx::query(
            r#"
            INSERT INTO indexer_sync_state (contract_address, last_block, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (contract_address) DO UPDATE
            SET last_block = GREATEST(indexer_sync_state.last_block, EXCLUDED.last_block),
                updated_at = NOW()
            "#,
        )
        .bind(contract)
        .bind(block)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    tx_type: String,
    user_address: String,
    token_address: String,
    amount: String,
    stake_id: Option<String>,
    duration: Option<String>,
    early: Option<bool>,
    message_id: Option<String>,
    destination_chain_selector: Option<String>,
    native_token: Option<String>,
    native_fee: Option<String>,
    tx_hash: String,
    block_number: i64,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> IndexerResult<Transaction> {
        let tx_type: TransactionKind = self.tx_type.parse().map_err(IndexerError::Internal)?;

        Ok(Transaction {
            id: self.id,
            record: NewTransaction {
                tx_type,
                user_address: self.user_address,
                token_address: self.token_address,
                amount: self.amount,
                stake_id: self.stake_id,
                duration: self.duration,
                early: self.early,
                message_id: self.message_id,
                destination_chain_selector: self.destination_chain_selector,
                native_token: self.native_token,
                native_fee: self.native_fee,
                tx_hash: self.tx_hash,
                block_number: self.block_number,
            },
            created_at: self.created_at,
        })
    }
}
