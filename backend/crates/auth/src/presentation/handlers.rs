//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::AUTH_TOKEN_COOKIE;
use crate::application::{
    CheckSessionUseCase, IssueNonceUseCase, SignOutUseCase, VerifySignatureInput,
    VerifySignatureUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    NonceResponse, SessionStatusResponse, UserResponse, VerifyRequest, VerifyResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Nonce
// ============================================================================

/// GET /api/auth/nonce/{address}
pub async fn get_nonce<R>(
    State(state): State<AuthAppState<R>>,
    Path(address): Path<String>,
) -> AuthResult<Json<NonceResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = IssueNonceUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&address).await?;

    Ok(Json(NonceResponse {
        message: output.message,
        nonce: output.nonce,
    }))
}

// ============================================================================
// Verify
// ============================================================================

/// POST /api/auth/verify
pub async fn verify<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<VerifyRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = VerifySignatureUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(VerifySignatureInput {
            address: req.address,
            signature: req.signature,
        })
        .await?;

    let cookies = output
        .session
        .set_cookie_directives(&state.config)
        .map(|directive| (header::SET_COOKIE, directive));

    Ok((
        StatusCode::OK,
        AppendHeaders(cookies),
        Json(VerifyResponse {
            success: true,
            user: UserResponse::from(&output.user),
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookies = SignOutUseCase::new(state.config.clone())
        .execute()
        .map(|directive| (header::SET_COOKIE, directive));

    (StatusCode::NO_CONTENT, AppendHeaders(cookies))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, AUTH_TOKEN_COOKIE);

    let user = match token {
        Some(token) => {
            let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
            match use_case.execute(&token).await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::debug!(error = %e, "Session check failed");
                    None
                }
            }
        }
        None => None,
    };

    Json(SessionStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserResponse::from),
    })
}
