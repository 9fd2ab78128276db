//! Rate Limiting Infrastructure
//!
//! Fixed-window per-key counters, an in-memory store and an axum middleware
//! that keys requests by client IP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use crate::client::extract_client_ip;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";

/// Wall clock in milliseconds, the time base of every window
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Key on the first `X-Forwarded-For` hop instead of the peer address
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 15,
            window: Duration::from_secs(60),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            trust_proxy: false,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Whole seconds until the window resets, rounded up
    pub fn retry_after_secs(&self, now_ms: i64) -> i64 {
        ((self.reset_at_ms - now_ms).max(0) + 999) / 1000
    }
}

pub type RateLimitStoreError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and report whether it is allowed
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitResult, RateLimitStoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at_ms: i64,
    count: u32,
}

/// Process-local fixed-window counters
///
/// Counters are not shared between replicas.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitStore {
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop windows that ended before `now_ms`
    pub async fn prune(&self, config: &RateLimitConfig, now_ms: i64) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now_ms - w.started_at_ms < config.window_ms());
        before - windows.len()
    }

    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.windows.lock().await.is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        let mut windows = self.windows.lock().await;

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at_ms: now_ms,
            count: 0,
        });

        if now_ms - window.started_at_ms >= config.window_ms() {
            *window = Window {
                started_at_ms: now_ms,
                count: 0,
            };
        }

        window.count = window.count.saturating_add(1);

        Ok(RateLimitResult {
            allowed: window.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_at_ms: window.started_at_ms + config.window_ms(),
        })
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Middleware state
#[derive(Clone)]
pub struct RateLimitState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<RateLimitConfig>,
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// Reject requests over the per-IP budget with 429.
///
/// The key is the peer address from `ConnectInfo`, or the forwarded client
/// address when `trust_proxy` is set. Requests whose IP cannot be determined
/// share one `unknown` bucket.
/// Store failures let the request through.
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = extract_client_ip(req.headers(), direct_ip, state.config.trust_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let now_ms = now_ms();

    let result = match state
        .store
        .check_and_increment(&key, &state.config, now_ms)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Rate limit store failed");
            return next.run(req).await;
        }
    };

    if !result.allowed {
        tracing::warn!(client = %key, "Rate limit exceeded");

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": RATE_LIMIT_MESSAGE })),
        )
            .into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(result.retry_after_secs(now_ms)),
        );
        return response;
    }

    next.run(req).await
}
