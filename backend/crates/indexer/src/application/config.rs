//! Application Configuration
//!
//! Configuration for the chain listener and reconciliation.

use alloy::primitives::Address;
use std::time::Duration;

/// Indexer configuration
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Websocket RPC endpoint of the node
    pub ws_url: String,
    /// Staking contract whose events are indexed
    pub contract_address: Address,
    /// First block scanned when no cursor is stored
    pub start_block: u64,
    /// Blocks per `eth_getLogs` request during reconciliation
    pub batch_size: u64,
    /// Pause between a dropped feed and the next connection attempt
    pub reconnect_delay: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://127.0.0.1:8545".to_string(),
            contract_address: Address::ZERO,
            start_block: 0,
            batch_size: 2_000,
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl IndexerConfig {
    /// Create config for development (local node, quick reconnects)
    pub fn development() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// Key under which the cursor is stored
    pub fn cursor_key(&self) -> String {
        format!("0x{}", alloy::hex::encode(self.contract_address))
    }

    /// Batch size clamped to at least one block
    pub fn effective_batch_size(&self) -> u64 {
        self.batch_size.max(1)
    }
}
