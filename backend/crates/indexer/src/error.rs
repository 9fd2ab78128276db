//! Indexer Error Types
//!
//! Indexer-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Only the transactions API ever turns
//! these into responses; the listener logs and drops them.

use alloy::primitives::B256;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Indexer-specific result type alias
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Indexer-specific error variants
#[derive(Debug, Error)]
pub enum IndexerError {
    /// topic0 matches none of the indexed events
    #[error("Unknown event signature: {0}")]
    UnknownEvent(B256),

    /// Log metadata required for a record is absent (pending log)
    #[error("Log is missing field: {0}")]
    MissingLogField(&'static str),

    /// ABI decoding failed for a recognised event
    #[error("Failed to decode event: {0}")]
    Decode(#[from] alloy::sol_types::Error),

    /// Node connection, subscription or query failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IndexerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            IndexerError::Rpc(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexerError::Rpc(_) => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            IndexerError::Database(e) => {
                tracing::error!(error = %e, "Indexer database error");
            }
            IndexerError::Rpc(msg) => {
                tracing::error!(message = %msg, "Indexer RPC error");
            }
            IndexerError::UnknownEvent(topic) => {
                tracing::warn!(topic0 = %topic, "Skipping log with unknown event signature");
            }
            _ => {
                tracing::error!(error = %self, "Indexer error");
            }
        }
    }
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for IndexerError {
    fn from(err: AppError) -> Self {
        IndexerError::Internal(err.to_string())
    }
}

impl From<alloy::transports::TransportError> for IndexerError {
    fn from(err: alloy::transports::TransportError) -> Self {
        IndexerError::Rpc(err.to_string())
    }
}
