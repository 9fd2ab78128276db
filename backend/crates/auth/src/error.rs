//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Address is not a syntactically valid Ethereum address
    #[error("Invalid Ethereum address")]
    InvalidAddress,

    /// Signature malformed or recovered signer does not match
    #[error("Invalid signature")]
    InvalidSignature,

    /// Unknown wallet with auto-provisioning disabled
    #[error("User not found")]
    UserNotFound,

    /// No `auth_token` cookie on a protected request
    #[error("No token provided")]
    MissingToken,

    /// Bearer token failed signature or expiry checks
    #[error("Invalid token")]
    InvalidToken,

    /// CSRF cookie and header missing or different
    #[error("Invalid CSRF token")]
    InvalidCsrfToken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAddress => StatusCode::BAD_REQUEST,
            AuthError::InvalidSignature | AuthError::MissingToken | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidAddress => ErrorKind::BadRequest,
            AuthError::InvalidSignature | AuthError::MissingToken | AuthError::InvalidToken => {
                ErrorKind::Unauthorized
            }
            AuthError::InvalidCsrfToken => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidSignature => {
                tracing::warn!("Invalid signature attempt");
            }
            AuthError::InvalidCsrfToken => {
                tracing::warn!("CSRF token mismatch");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        match err {
            platform::token::TokenError::Encode(msg) => AuthError::Internal(msg),
            platform::token::TokenError::InvalidKey => {
                AuthError::Internal("Signing key rejected".to_string())
            }
            _ => AuthError::InvalidToken,
        }
    }
}
