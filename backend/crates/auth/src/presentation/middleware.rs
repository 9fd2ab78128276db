//! Auth Middleware
//!
//! CSRF double-submit check and session-cookie guard for protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;
use platform::crypto::constant_time_eq;
use std::sync::Arc;

use crate::application::check_session::verify_token;
use crate::application::config::AuthConfig;
use crate::application::session::{AUTH_TOKEN_COOKIE, CSRF_TOKEN_COOKIE};
use crate::error::AuthError;

/// Header carrying the CSRF token copied from `csrf_token_client`
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Paths that obtain or discard tokens and so cannot present one
pub const CSRF_EXEMPT_PATHS: [&str; 2] = ["/api/auth/verify", "/api/auth/signout"];

/// Reject state-changing requests whose CSRF header does not match the cookie
pub async fn csrf_guard(req: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let path = req.uri().path();
    if is_safe_method(req.method()) || CSRF_EXEMPT_PATHS.iter().any(|exempt| *exempt == path) {
        return Ok(next.run(req).await);
    }

    let headers = req.headers();
    let cookie_token = extract_cookie(headers, CSRF_TOKEN_COOKIE);
    let header_token = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());

    let valid = match (cookie_token, header_token) {
        (Some(cookie), Some(header)) => constant_time_eq(cookie.as_bytes(), header.as_bytes()),
        _ => false,
    };

    if !valid {
        return Err(AuthError::InvalidCsrfToken);
    }

    Ok(next.run(req).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid `auth_token` session cookie.
///
/// On success the caller's [`kernel::principal::Principal`] is inserted into
/// request extensions.
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token =
        extract_cookie(req.headers(), AUTH_TOKEN_COOKIE).ok_or(AuthError::MissingToken)?;

    let principal = verify_token(&state.config, &token)?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
