//! Unit tests for Indexer crate

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use alloy::primitives::{Address, B256, LogData, U256};
    use alloy::rpc::types::Log;
    use alloy::sol_types::SolEvent;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::domain::chain::LogSource;
    use crate::domain::entities::{NewTransaction, Transaction};
    use crate::domain::events::{ClaimedRewards, Staked};
    use crate::domain::repository::{SyncStateRepository, TransactionRepository};
    use crate::error::{IndexerError, IndexerResult};

    pub const CONTRACT: Address = Address::repeat_byte(0xcc);

    /// In-memory transactions table and cursor store
    #[derive(Clone, Default)]
    pub struct MemoryIndexerRepo {
        rows: Arc<Mutex<Vec<Transaction>>>,
        cursors: Arc<Mutex<HashMap<String, u64>>>,
        fail_inserts: Arc<AtomicBool>,
    }

    impl MemoryIndexerRepo {
        pub async fn rows(&self) -> Vec<NewTransaction> {
            self.rows
                .lock()
                .await
                .iter()
                .map(|tx| tx.record.clone())
                .collect()
        }

        pub async fn cursor(&self, key: &str) -> Option<u64> {
            self.cursors.lock().await.get(key).copied()
        }

        pub async fn set_cursor(&self, key: &str, block: u64) {
            self.cursors.lock().await.insert(key.to_string(), block);
        }

        pub fn fail_inserts(&self) {
            self.fail_inserts.store(true, Ordering::SeqCst);
        }
    }

    impl TransactionRepository for MemoryIndexerRepo {
        async fn insert(&self, tx: &NewTransaction) -> IndexerResult<bool> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(IndexerError::Internal("connection reset".to_string()));
            }

            let mut rows = self.rows.lock().await;
            if rows.iter().any(|row| row.record.tx_hash == tx.tx_hash) {
                return Ok(false);
            }
            let id = rows.len() as i64 + 1;
            rows.push(Transaction {
                id,
                record: tx.clone(),
                created_at: Utc::now(),
            });
            Ok(true)
        }

        async fn find_by_user(
            &self,
            user_address: &str,
            limit: i64,
        ) -> IndexerResult<Vec<Transaction>> {
            let mut matching: Vec<Transaction> = self
                .rows
                .lock()
                .await
                .iter()
                .filter(|tx| tx.record.user_address == user_address)
                .cloned()
                .collect();
            matching.sort_by(|a, b| {
                b.record
                    .block_number
                    .cmp(&a.record.block_number)
                    .then(b.id.cmp(&a.id))
            });
            matching.truncate(limit as usize);
            Ok(matching)
        }
    }

    impl SyncStateRepository for MemoryIndexerRepo {
        async fn load_cursor(&self, contract: &str) -> IndexerResult<Option<u64>> {
            Ok(self.cursor(contract).await)
        }

        async fn save_cursor(&self, contract: &str, block: u64) -> IndexerResult<()> {
            let mut cursors = self.cursors.lock().await;
            let entry = cursors.entry(contract.to_string()).or_insert(block);
            *entry = (*entry).max(block);
            Ok(())
        }
    }

    /// Fixed set of mined logs, recording every queried range
    #[derive(Default)]
    pub struct MemoryLogSource {
        pub logs: Vec<Log>,
        pub head: u64,
        pub queries: Mutex<Vec<(u64, u64)>>,
    }

    impl MemoryLogSource {
        pub fn new(logs: Vec<Log>, head: u64) -> Self {
            Self {
                logs,
                head,
                queries: Mutex::new(Vec::new()),
            }
        }

        pub async fn queries(&self) -> Vec<(u64, u64)> {
            self.queries.lock().await.clone()
        }
    }

    impl LogSource for MemoryLogSource {
        async fn block_number(&self) -> IndexerResult<u64> {
            Ok(self.head)
        }

        async fn logs(&self, from: u64, to: u64) -> IndexerResult<Vec<Log>> {
            self.queries.lock().await.push((from, to));
            Ok(self
                .logs
                .iter()
                .filter(|log| {
                    log.block_number
                        .is_some_and(|block| (from..=to).contains(&block))
                })
                .cloned()
                .collect())
        }
    }

    pub fn mined(data: LogData, tx_hash: B256, block: u64) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: CONTRACT,
                data,
            },
            block_number: Some(block),
            transaction_hash: Some(tx_hash),
            ..Default::default()
        }
    }

    pub fn staked_log(user: Address, amount: u64, tx_hash: B256, block: u64) -> Log {
        let data = Staked {
            stakeId: U256::from(1),
            user,
            token: Address::repeat_byte(0x77),
            amount: U256::from(amount),
            duration: U256::ZERO,
        }
        .encode_log_data();
        mined(data, tx_hash, block)
    }

    pub fn claimed_log(user: Address, tx_hash: B256, block: u64) -> Log {
        let data = ClaimedRewards {
            stakeId: U256::from(2),
            user,
            token: Address::repeat_byte(0x77),
            amount: U256::from(10),
        }
        .encode_log_data();
        mined(data, tx_hash, block)
    }

    pub fn hex(bytes: impl AsRef<[u8]>) -> String {
        format!("0x{}", alloy::hex::encode(bytes))
    }
}

#[cfg(test)]
mod indexer_tests {
    use std::sync::Arc;

    use alloy::primitives::{Address, B256, LogData};

    use super::support::*;
    use crate::application::config::IndexerConfig;
    use crate::application::event_indexer::{EventIndexer, LogOutcome};
    use crate::domain::entities::TransactionKind;

    fn config(batch_size: u64, start_block: u64) -> Arc<IndexerConfig> {
        Arc::new(IndexerConfig {
            contract_address: CONTRACT,
            batch_size,
            start_block,
            ..IndexerConfig::development()
        })
    }

    fn indexer(
        repo: &MemoryIndexerRepo,
        config: Arc<IndexerConfig>,
    ) -> EventIndexer<MemoryIndexerRepo, MemoryIndexerRepo> {
        EventIndexer::new(Arc::new(repo.clone()), Arc::new(repo.clone()), config)
    }

    #[tokio::test]
    async fn test_staked_event_stores_one_stake_row() {
        let repo = MemoryIndexerRepo::default();
        let indexer = indexer(&repo, config(100, 0));
        let user = Address::repeat_byte(0xAB);
        let h1 = B256::repeat_byte(0x01);

        let outcome = indexer.handle_log(&staked_log(user, 1000, h1, 10)).await;

        assert_eq!(outcome, LogOutcome::Inserted);
        let rows = repo.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tx_type, TransactionKind::Stake);
        assert_eq!(rows[0].amount, "1000");
        assert_eq!(rows[0].tx_hash, hex(h1));
        assert_eq!(rows[0].user_address, hex(user));
        assert_eq!(rows[0].stake_id.as_deref(), Some("1"));
        assert_eq!(rows[0].duration.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_same_tx_hash_is_stored_once() {
        let repo = MemoryIndexerRepo::default();
        let indexer = indexer(&repo, config(100, 0));
        let user = Address::repeat_byte(0x01);
        let hash = B256::repeat_byte(0x02);

        let first = indexer.handle_log(&staked_log(user, 5, hash, 3)).await;
        let second = indexer.handle_log(&claimed_log(user, hash, 3)).await;

        assert_eq!(first, LogOutcome::Inserted);
        assert_eq!(second, LogOutcome::Duplicate);
        let rows = repo.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tx_type, TransactionKind::Stake);
    }

    #[tokio::test]
    async fn test_live_log_marks_previous_block_processed() {
        let repo = MemoryIndexerRepo::default();
        let config = config(100, 0);
        let key = config.cursor_key();
        let indexer = indexer(&repo, config);

        indexer
            .handle_log(&staked_log(Address::ZERO, 1, B256::repeat_byte(9), 42))
            .await;

        assert_eq!(repo.cursor(&key).await, Some(41));
    }

    #[tokio::test]
    async fn test_unknown_event_is_dropped() {
        let repo = MemoryIndexerRepo::default();
        let indexer = indexer(&repo, config(100, 0));
        let data = LogData::new_unchecked(vec![B256::repeat_byte(0x55)], Default::default());

        let outcome = indexer.handle_log(&mined(data, B256::ZERO, 1)).await;

        assert_eq!(outcome, LogOutcome::Dropped);
        assert!(repo.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_removed_log_is_dropped() {
        let repo = MemoryIndexerRepo::default();
        let indexer = indexer(&repo, config(100, 0));
        let mut log = staked_log(Address::ZERO, 1, B256::repeat_byte(3), 5);
        log.removed = true;

        assert_eq!(indexer.handle_log(&log).await, LogOutcome::Dropped);
        assert!(repo.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_is_logged_and_dropped() {
        let repo = MemoryIndexerRepo::default();
        repo.fail_inserts();
        let config = config(100, 0);
        let key = config.cursor_key();
        let indexer = indexer(&repo, config);

        let outcome = indexer
            .handle_log(&staked_log(Address::ZERO, 1, B256::repeat_byte(4), 8))
            .await;

        assert_eq!(outcome, LogOutcome::Dropped);
        assert!(repo.rows().await.is_empty());
        assert_eq!(repo.cursor(&key).await, Some(7));
    }

    #[tokio::test]
    async fn test_reconcile_scans_in_batches_from_start_block() {
        let repo = MemoryIndexerRepo::default();
        let config = config(10, 0);
        let key = config.cursor_key();
        let indexer = indexer(&repo, config);
        let user = Address::repeat_byte(0x10);
        let source = MemoryLogSource::new(
            vec![
                staked_log(user, 1, B256::repeat_byte(0xa1), 5),
                claimed_log(user, B256::repeat_byte(0xa2), 12),
                staked_log(user, 3, B256::repeat_byte(0xa3), 25),
            ],
            30,
        );

        let replayed = indexer.reconcile(&source, 30).await.unwrap();

        assert_eq!(replayed, 3);
        assert_eq!(
            source.queries().await,
            vec![(0, 9), (10, 19), (20, 29), (30, 30)]
        );
        assert_eq!(repo.rows().await.len(), 3);
        assert_eq!(repo.cursor(&key).await, Some(30));
    }

    #[tokio::test]
    async fn test_reconcile_resumes_after_cursor() {
        let repo = MemoryIndexerRepo::default();
        let config = config(100, 0);
        let key = config.cursor_key();
        repo.set_cursor(&key, 19).await;
        let indexer = indexer(&repo, config);
        let user = Address::repeat_byte(0x10);
        let source = MemoryLogSource::new(
            vec![
                staked_log(user, 1, B256::repeat_byte(0xb1), 19),
                staked_log(user, 2, B256::repeat_byte(0xb2), 20),
            ],
            50,
        );

        let replayed = indexer.reconcile(&source, 50).await.unwrap();

        assert_eq!(replayed, 1);
        assert_eq!(source.queries().await, vec![(20, 50)]);
        let rows = repo.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].block_number, 20);
    }

    #[tokio::test]
    async fn test_reconcile_honours_later_start_block() {
        let repo = MemoryIndexerRepo::default();
        let config = config(100, 1_000);
        let key = config.cursor_key();
        repo.set_cursor(&key, 10).await;
        let indexer = indexer(&repo, config);
        let source = MemoryLogSource::new(Vec::new(), 1_050);

        indexer.reconcile(&source, 1_050).await.unwrap();

        assert_eq!(source.queries().await, vec![(1_000, 1_050)]);
    }

    #[tokio::test]
    async fn test_reconcile_at_head_does_nothing() {
        let repo = MemoryIndexerRepo::default();
        let config = config(100, 0);
        let key = config.cursor_key();
        repo.set_cursor(&key, 30).await;
        let indexer = indexer(&repo, config);
        let source = MemoryLogSource::new(Vec::new(), 30);

        let replayed = indexer.reconcile(&source, 30).await.unwrap();

        assert_eq!(replayed, 0);
        assert!(source.queries().await.is_empty());
    }

    #[tokio::test]
    async fn test_replayed_logs_already_seen_live_are_duplicates() {
        let repo = MemoryIndexerRepo::default();
        let indexer = indexer(&repo, config(100, 0));
        let log = staked_log(Address::repeat_byte(1), 1, B256::repeat_byte(0xc1), 7);

        indexer.handle_log(&log).await;
        let source = MemoryLogSource::new(vec![log], 7);
        let replayed = indexer.reconcile(&source, 7).await.unwrap();

        assert_eq!(replayed, 1);
        assert_eq!(repo.rows().await.len(), 1);
    }
}

#[cfg(test)]
mod listener_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::watch;

    use super::support::*;
    use crate::application::config::IndexerConfig;
    use crate::application::listener::ChainListener;

    fn unreachable_node() -> Arc<IndexerConfig> {
        Arc::new(IndexerConfig {
            ws_url: "ws://127.0.0.1:9".to_string(),
            contract_address: CONTRACT,
            reconnect_delay: Duration::from_millis(20),
            ..IndexerConfig::default()
        })
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_shut_down() {
        let repo = Arc::new(MemoryIndexerRepo::default());
        let listener = ChainListener::new(repo.clone(), repo, unreachable_node());
        let (tx, rx) = watch::channel(true);

        tokio::time::timeout(Duration::from_secs(5), listener.run(rx))
            .await
            .expect("listener should stop");
        drop(tx);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_while_reconnecting() {
        let repo = Arc::new(MemoryIndexerRepo::default());
        let listener = ChainListener::new(repo.clone(), repo, unreachable_node());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(listener.run(rx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("listener should stop")
            .unwrap();
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use kernel::id::UserId;
    use kernel::principal::Principal;
    use tower::ServiceExt;

    use alloy::primitives::{Address, B256};

    use super::support::*;
    use crate::application::config::IndexerConfig;
    use crate::application::event_indexer::EventIndexer;
    use crate::presentation::router::transactions_router_generic;
    use std::sync::Arc;

    async fn seeded_repo(me: Address, other: Address) -> MemoryIndexerRepo {
        let repo = MemoryIndexerRepo::default();
        let indexer = EventIndexer::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(IndexerConfig::default()),
        );
        indexer.handle_log(&staked_log(me, 1, B256::repeat_byte(1), 10)).await;
        indexer.handle_log(&claimed_log(me, B256::repeat_byte(2), 30)).await;
        indexer.handle_log(&staked_log(other, 9, B256::repeat_byte(3), 20)).await;
        indexer.handle_log(&staked_log(me, 3, B256::repeat_byte(4), 20)).await;
        repo
    }

    fn app(repo: MemoryIndexerRepo, wallet: Address) -> Router {
        let principal = Principal::new(UserId::new(), hex(wallet));
        Router::new()
            .nest("/api/transactions", transactions_router_generic(repo))
            .layer(axum::Extension(principal))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_lists_only_callers_transactions_newest_first() {
        let me = Address::repeat_byte(0xaa);
        let other = Address::repeat_byte(0xbb);
        let repo = seeded_repo(me, other).await;

        let (status, body) = get_json(app(repo, me), "/api/transactions").await;

        assert_eq!(status, StatusCode::OK);
        let txs = body["transactions"].as_array().unwrap();
        assert_eq!(txs.len(), 3);
        let blocks: Vec<i64> = txs
            .iter()
            .map(|tx| tx["blockNumber"].as_i64().unwrap())
            .collect();
        assert_eq!(blocks, vec![30, 20, 10]);
        assert_eq!(txs[0]["type"], "CLAIM_REWARDS");
        assert_eq!(txs[0]["userAddress"], hex(me));
        assert!(txs[0].get("duration").is_none());
        assert_eq!(txs[2]["type"], "STAKE");
        assert_eq!(txs[2]["amount"], "1");
    }

    #[tokio::test]
    async fn test_limit_caps_page_size() {
        let me = Address::repeat_byte(0xaa);
        let repo = seeded_repo(me, Address::repeat_byte(0xbb)).await;

        let (status, body) = get_json(app(repo, me), "/api/transactions?limit=1").await;

        assert_eq!(status, StatusCode::OK);
        let txs = body["transactions"].as_array().unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0]["blockNumber"], 30);
    }

    #[tokio::test]
    async fn test_wallet_without_activity_gets_empty_list() {
        let repo = seeded_repo(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)).await;

        let (status, body) =
            get_json(app(repo, Address::repeat_byte(0xcc)), "/api/transactions").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"], serde_json::json!([]));
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::error::IndexerError;

    #[test]
    fn test_rpc_errors_are_service_unavailable() {
        let err = IndexerError::Rpc("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_errors_are_500() {
        let response = IndexerError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            IndexerError::MissingLogField("block_number").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
