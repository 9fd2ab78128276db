//! Runtime settings
//!
//! Environment variables parsed into the typed configs of each crate.
//! Lookups go through a closure so parsing is testable without touching
//! the process environment.

use alloy::primitives::Address;
use anyhow::{Context, bail};
use auth::{AuthConfig, ChallengePolicy, MAX_SESSION_TTL};
use indexer::IndexerConfig;
use platform::rate_limit::RateLimitConfig;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => bail!("unknown APP_ENV: {other}"),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub app_env: AppEnv,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Single allowed CORS origin
    pub client_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Production,
            port: 3010,
            database_url: String::new(),
            db_max_connections: 5,
            client_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn development() -> Self {
        Self {
            app_env: AppEnv::Development,
            ..Default::default()
        }
    }
}

/// Everything `main` needs to start
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    /// `None` when no contract is configured; the listener is not started
    pub indexer: Option<IndexerConfig>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let app_env = match get("APP_ENV") {
            Some(value) => value.parse()?,
            None => AppEnv::Development,
        };

        let mut server = match app_env {
            AppEnv::Development => ServerSettings::development(),
            AppEnv::Production => ServerSettings::default(),
        };
        server.database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        if let Some(port) = get("PORT") {
            server.port = parse_var("PORT", &port)?;
        }
        if let Some(max) = get("DATABASE_MAX_CONNECTIONS") {
            server.db_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &max)?;
        }
        if let Some(origin) = get("CLIENT_ORIGIN") {
            server.client_origin = origin;
        }

        let mut auth = match (app_env, get("JWT_SECRET")) {
            (AppEnv::Production, Some(secret)) => AuthConfig {
                jwt_secret: secret.into_bytes(),
                ..AuthConfig::default()
            },
            (AppEnv::Production, None) => bail!("JWT_SECRET must be set in production"),
            (AppEnv::Development, Some(secret)) => AuthConfig {
                jwt_secret: secret.into_bytes(),
                ..AuthConfig::development()
            },
            (AppEnv::Development, None) => {
                tracing::warn!("JWT_SECRET not set, using a random secret for this run");
                AuthConfig::development()
            }
        };
        if let Some(policy) = get("AUTH_CHALLENGE") {
            auth.challenge = ChallengePolicy::from_str(&policy).map_err(anyhow::Error::msg)?;
        }
        if let Some(flag) = get("AUTH_AUTO_PROVISION") {
            auth.auto_provision_users = parse_bool("AUTH_AUTO_PROVISION", &flag)?;
        }
        if let Some(ttl) = get("SESSION_TTL_SECS") {
            let ttl = Duration::from_secs(parse_var("SESSION_TTL_SECS", &ttl)?);
            if ttl.is_zero() || ttl > MAX_SESSION_TTL {
                bail!(
                    "SESSION_TTL_SECS must be between 1 and {}",
                    MAX_SESSION_TTL.as_secs()
                );
            }
            auth.session_ttl = ttl;
        }

        let mut rate_limit = RateLimitConfig::default();
        if let Some(max) = get("RATE_LIMIT") {
            rate_limit.max_requests = parse_var("RATE_LIMIT", &max)?;
        }
        if let Some(flag) = get("TRUST_PROXY") {
            rate_limit.trust_proxy = parse_bool("TRUST_PROXY", &flag)?;
        }

        let indexer = match get("STAKING_CONTRACT_ADDRESS") {
            Some(contract) => {
                let mut config = match app_env {
                    AppEnv::Development => IndexerConfig::development(),
                    AppEnv::Production => IndexerConfig::default(),
                };
                config.contract_address = Address::from_str(contract.trim())
                    .with_context(|| format!("STAKING_CONTRACT_ADDRESS is not an address: {contract}"))?;
                if let Some(url) = get("CHAIN_WS_URL") {
                    config.ws_url = url;
                }
                match (app_env, get("INDEXER_START_BLOCK")) {
                    (_, Some(block)) => {
                        config.start_block = parse_var("INDEXER_START_BLOCK", &block)?;
                    }
                    (AppEnv::Production, None) => {
                        bail!("INDEXER_START_BLOCK must be set in production")
                    }
                    (AppEnv::Development, None) => {
                        tracing::warn!("INDEXER_START_BLOCK not set, backfilling from block 0");
                    }
                }
                if let Some(size) = get("INDEXER_BATCH_SIZE") {
                    config.batch_size = parse_var("INDEXER_BATCH_SIZE", &size)?;
                }
                if let Some(secs) = get("INDEXER_RECONNECT_SECS") {
                    config.reconnect_delay =
                        Duration::from_secs(parse_var("INDEXER_RECONNECT_SECS", &secs)?);
                }
                Some(config)
            }
            None => None,
        };

        Ok(Self {
            server,
            auth,
            rate_limit,
            indexer,
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid {key} value {value:?}: {e}"))
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid {key} value {other:?}: expected true or false"),
    }
}
