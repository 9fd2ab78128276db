//! Event Indexer
//!
//! Turns contract logs into `transactions` rows and keeps the block cursor.
//! Failures on a single log are logged and dropped; only cursor reads and
//! chain queries abort a reconciliation pass.

use alloy::rpc::types::Log;
use std::sync::Arc;

use crate::application::config::IndexerConfig;
use crate::domain::chain::LogSource;
use crate::domain::events::StakingEvent;
use crate::domain::repository::{SyncStateRepository, TransactionRepository};
use crate::error::IndexerResult;

/// What happened to a single log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// A new row was written
    Inserted,
    /// The tx hash was already stored
    Duplicate,
    /// Removed by a reorg, undecodable, or the insert failed
    Dropped,
}

pub struct EventIndexer<T, S>
where
    T: TransactionRepository,
    S: SyncStateRepository,
{
    transactions: Arc<T>,
    sync_state: Arc<S>,
    config: Arc<IndexerConfig>,
    cursor_key: String,
}

impl<T, S> EventIndexer<T, S>
where
    T: TransactionRepository,
    S: SyncStateRepository,
{
    pub fn new(transactions: Arc<T>, sync_state: Arc<S>, config: Arc<IndexerConfig>) -> Self {
        let cursor_key = config.cursor_key();
        Self {
            transactions,
            sync_state,
            config,
            cursor_key,
        }
    }

    /// Index one live log, then mark every earlier block as processed.
    pub async fn handle_log(&self, log: &Log) -> LogOutcome {
        let outcome = self.process_log(log).await;

        if let Some(block) = log.block_number
            && block > 0
        {
            self.advance_cursor(block - 1).await;
        }

        outcome
    }

    /// Replay logs from the cursor (or configured start block) up to `head`.
    ///
    /// Returns the number of logs fed through the indexer.
    pub async fn reconcile<L>(&self, source: &L, head: u64) -> IndexerResult<usize>
    where
        L: LogSource + Sync,
    {
        let from = match self.sync_state.load_cursor(&self.cursor_key).await? {
            Some(cursor) => cursor.saturating_add(1).max(self.config.start_block),
            None => self.config.start_block,
        };

        if from > head {
            tracing::debug!(from, head, "Cursor is at head, nothing to reconcile");
            return Ok(0);
        }

        let batch_size = self.config.effective_batch_size();
        let mut processed = 0;
        let mut start = from;

        while start <= head {
            let end = start.saturating_add(batch_size - 1).min(head);
            let logs = source.logs(start, end).await?;

            for log in &logs {
                self.process_log(log).await;
            }
            processed += logs.len();
            self.advance_cursor(end).await;

            tracing::info!(from = start, to = end, logs = logs.len(), "Reconciled block range");

            if end == u64::MAX {
                break;
            }
            start = end + 1;
        }

        Ok(processed)
    }

    async fn process_log(&self, log: &Log) -> LogOutcome {
        if log.removed {
            tracing::warn!(tx_hash = ?log.transaction_hash, "Ignoring log removed by reorg");
            return LogOutcome::Dropped;
        }

        let record = match StakingEvent::decode(log) {
            Ok(event) => event.into_record(),
            Err(e) => {
                e.log();
                return LogOutcome::Dropped;
            }
        };

        match self.transactions.insert(&record).await {
            Ok(true) => {
                tracing::info!(
                    tx_hash = %record.tx_hash,
                    tx_type = %record.tx_type,
                    user = %record.user_address,
                    block = record.block_number,
                    "Indexed transaction"
                );
                LogOutcome::Inserted
            }
            Ok(false) => {
                tracing::debug!(tx_hash = %record.tx_hash, "Transaction already indexed");
                LogOutcome::Duplicate
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    tx_hash = %record.tx_hash,
                    tx_type = %record.tx_type,
                    "Failed to store transaction, dropping event"
                );
                LogOutcome::Dropped
            }
        }
    }

    async fn advance_cursor(&self, block: u64) {
        if let Err(e) = self.sync_state.save_cursor(&self.cursor_key, block).await {
            tracing::error!(error = %e, block, "Failed to save block cursor");
        }
    }
}
