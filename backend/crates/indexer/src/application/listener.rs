//! Chain Listener
//!
//! Long-lived task: connect, subscribe, reconcile missed blocks, then follow
//! the live feed. A dropped feed is retried after a fixed delay until the
//! shutdown signal fires.

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::config::IndexerConfig;
use crate::application::event_indexer::EventIndexer;
use crate::domain::chain::LogSource;
use crate::domain::repository::{SyncStateRepository, TransactionRepository};
use crate::error::IndexerResult;
use crate::infra::chain::ChainClient;

pub struct ChainListener<T, S>
where
    T: TransactionRepository + Send + Sync + 'static,
    S: SyncStateRepository + Send + Sync + 'static,
{
    indexer: EventIndexer<T, S>,
    config: Arc<IndexerConfig>,
}

impl<T, S> ChainListener<T, S>
where
    T: TransactionRepository + Send + Sync + 'static,
    S: SyncStateRepository + Send + Sync + 'static,
{
    pub fn new(transactions: Arc<T>, sync_state: Arc<S>, config: Arc<IndexerConfig>) -> Self {
        Self {
            indexer: EventIndexer::new(transactions, sync_state, config.clone()),
            config,
        }
    }

    /// Run until `shutdown` carries `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            contract = %self.config.contract_address,
            start_block = self.config.start_block,
            "Chain listener starting"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let outcome = tokio::select! {
                outcome = self.run_session() => outcome,
                _ = shutdown.changed() => break,
            };

            match outcome {
                Ok(()) => tracing::warn!("Log subscription closed by the node"),
                Err(e) => e.log(),
            }

            tracing::info!(
                delay_secs = self.config.reconnect_delay.as_secs_f64(),
                "Reconnecting to chain node after delay"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Chain listener stopped");
    }

    async fn run_session(&self) -> IndexerResult<()> {
        let client =
            ChainClient::connect_ws(&self.config.ws_url, self.config.contract_address).await?;

        // Subscribe before reading the head so no block falls between the two.
        let subscription = client.subscribe().await?;
        let head = client.block_number().await?;

        let replayed = self.indexer.reconcile(&client, head).await?;
        tracing::info!(head, replayed, "Caught up, following live logs");

        let mut stream = subscription.into_stream();
        while let Some(log) = stream.next().await {
            self.indexer.handle_log(&log).await;
        }

        Ok(())
    }
}
