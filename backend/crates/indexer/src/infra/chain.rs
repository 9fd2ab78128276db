//! Websocket chain client

use alloy::network::Ethereum;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::pubsub::Subscription;
use alloy::rpc::types::{Filter, Log};
use std::sync::Arc;

use crate::domain::chain::LogSource;
use crate::domain::events::event_signatures;
use crate::error::IndexerResult;

/// Boxed provider trait for websocket connections
pub type BoxedProvider = Arc<dyn Provider<Ethereum> + Send + Sync>;

/// Provider bound to the staking contract's event filter
#[derive(Clone)]
pub struct ChainClient {
    provider: BoxedProvider,
    contract: Address,
}

impl ChainClient {
    pub fn new(provider: BoxedProvider, contract: Address) -> Self {
        Self { provider, contract }
    }

    /// Open a websocket connection to the node
    pub async fn connect_ws(ws_url: &str, contract: Address) -> IndexerResult<Self> {
        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(ws_url))
            .await?;

        tracing::info!(ws_url, contract = %contract, "Connected to chain node");

        Ok(Self::new(Arc::new(provider), contract))
    }

    /// Filter on the contract address and the four event signatures
    pub fn filter(&self) -> Filter {
        Filter::new()
            .address(self.contract)
            .event_signature(event_signatures())
    }

    /// Subscribe to new logs matching [`Self::filter`]
    pub async fn subscribe(&self) -> IndexerResult<Subscription<Log>> {
        Ok(self.provider.subscribe_logs(&self.filter()).await?)
    }
}

impl LogSource for ChainClient {
    async fn block_number(&self) -> IndexerResult<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn logs(&self, from: u64, to: u64) -> IndexerResult<Vec<Log>> {
        let filter = self.filter().from_block(from).to_block(to);
        Ok(self.provider.get_logs(&filter).await?)
    }
}
