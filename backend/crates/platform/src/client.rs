//! Client identification utilities

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract client IP address
///
/// `X-Forwarded-For` is client-controlled, so its first hop is only used when
/// `trust_proxy` is set (the service sits behind a reverse proxy that
/// overwrites the header). Otherwise the direct connection IP is used.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_proxy: bool,
) -> Option<IpAddr> {
    if !trust_proxy {
        return direct_ip;
    }

    // First hop in the list is the original client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first_ip) = xff.split(',').next()
        && let Ok(ip) = first_ip.trim().parse::<IpAddr>()
    {
        return Some(ip);
    }
    direct_ip
}
