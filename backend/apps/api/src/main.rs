//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use anyhow::Context;
use auth::PgAuthRepository;
use indexer::{ChainListener, PgIndexerRepository};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitState, now_ms};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,indexer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("Invalid configuration")?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(settings.server.db_max_connections)
        .connect(&settings.server.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations completed");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Chain listener
    let listener_task = match settings.indexer.clone() {
        Some(indexer_config) => {
            let repo = Arc::new(PgIndexerRepository::new(pool.clone()));
            let listener = ChainListener::new(repo.clone(), repo, Arc::new(indexer_config));
            Some(tokio::spawn(listener.run(shutdown_rx.clone())))
        }
        None => {
            tracing::warn!("STAKING_CONTRACT_ADDRESS not set, chain listener disabled");
            None
        }
    };

    // Rate limiting, with expired windows pruned in the background
    let rate_limit_state =
        RateLimitState::new(InMemoryRateLimitStore::new(), settings.rate_limit.clone());
    tokio::spawn(prune_rate_limits(
        rate_limit_state.clone(),
        shutdown_rx.clone(),
    ));

    // Build router
    let app = app::build_app(
        PgAuthRepository::new(pool.clone()),
        PgIndexerRepository::new(pool.clone()),
        Arc::new(settings.auth.clone()),
        rate_limit_state,
        &settings.server.client_origin,
    )?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    tracing::info!(env = ?settings.server.app_env, "Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_tx))
    .await?;

    if let Some(task) = listener_task
        && let Err(e) = task.await
    {
        tracing::error!(error = %e, "Chain listener task failed");
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, then tell background tasks to stop.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
}

async fn prune_rate_limits(
    state: RateLimitState<InMemoryRateLimitStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(state.config.window);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = state.store.prune(&state.config, now_ms()).await;
                if removed > 0 {
                    tracing::debug!(removed, "Pruned rate limit windows");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
