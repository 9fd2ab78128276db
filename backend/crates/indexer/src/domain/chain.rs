//! Chain access port
//!
//! Block-range log queries used by reconciliation. Implemented over a live
//! provider in `infra::chain` and by in-memory sources in tests.

use alloy::rpc::types::Log;

use crate::error::IndexerResult;

#[trait_variant::make(LogSource: Send)]
pub trait LocalLogSource {
    /// Current head block number
    async fn block_number(&self) -> IndexerResult<u64>;

    /// Logs of the indexed events in `[from, to]`, in chain order
    async fn logs(&self, from: u64, to: u64) -> IndexerResult<Vec<Log>>;
}
