//! Router assembly
//!
//! Layer order, outermost first: access log, CORS, security headers,
//! per-IP rate limit, CSRF guard. `/api/transactions` additionally
//! requires a valid `auth_token` session cookie.

use anyhow::Context;
use auth::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::presentation::{AuthMiddlewareState, auth_router_generic, csrf_guard, require_auth};
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware;
use axum::routing::get;
use indexer::domain::repository::TransactionRepository;
use indexer::presentation::transactions_router_generic;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitState, rate_limit};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// GET /
async fn health() -> &'static str {
    "All is well"
}

pub fn build_app<U, T>(
    users: U,
    transactions: T,
    auth_config: Arc<AuthConfig>,
    rate_limit_state: RateLimitState<InMemoryRateLimitStore>,
    client_origin: &str,
) -> anyhow::Result<Router>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    T: TransactionRepository + Clone + Send + Sync + 'static,
{
    let origin: HeaderValue = client_origin
        .parse()
        .with_context(|| format!("CLIENT_ORIGIN is not a valid header value: {client_origin}"))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(auth::middleware::CSRF_HEADER),
        ]))
        .allow_credentials(true);

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    let transactions = transactions_router_generic(transactions).route_layer(
        middleware::from_fn_with_state(
            AuthMiddlewareState {
                config: auth_config.clone(),
            },
            require_auth,
        ),
    );

    let app = Router::new()
        .route("/", get(health))
        .nest("/api/auth", auth_router_generic(users, auth_config))
        .nest("/api/transactions", transactions)
        .layer(middleware::from_fn(csrf_guard))
        .layer(middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit::<InMemoryRateLimitStore>,
        ))
        .layer(security_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
