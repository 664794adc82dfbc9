//! Per-client rate limiting middleware

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::ApiError;
use crate::infrastructure::rate_limit::{RateLimitResult, RateLimiter};

/// Body message for a client over its request budget
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Limiter plus the policy for deriving a client's address
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    /// Key on the first `X-Forwarded-For` hop instead of the socket peer
    pub trust_proxy: bool,
}

impl RateLimitState {
    pub fn new(limiter: Arc<RateLimiter>, trust_proxy: bool) -> Self {
        Self {
            limiter,
            trust_proxy,
        }
    }
}

/// Count the request against the client's window and refuse it when spent
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request, state.trust_proxy);
    let result = state.limiter.check_and_record(&key).await;

    let mut response = if result.allowed {
        next.run(request).await
    } else {
        ApiError::rate_limited(RATE_LIMIT_MESSAGE).into_response()
    };

    apply_headers(response.headers_mut(), &result);
    response
}

/// Socket peer address; the forwarded hop only when a proxy is trusted
fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert("ratelimit-limit", HeaderValue::from(result.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(result.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(result.reset_in_seconds));
}
