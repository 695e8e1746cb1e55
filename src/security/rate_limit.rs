//! Per-client rate limiting middleware.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;

use crate::config::RateLimitPolicyConfig;
use crate::observability::metrics;

const HEADER_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const HEADER_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const HEADER_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
const HEADER_RETRY_AFTER: HeaderName = HeaderName::from_static("retry-after");

/// One named window policy.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Policy identifier for logs and metrics.
    pub name: &'static str,
    /// Window length.
    pub window: Duration,
    /// Requests admitted per window per client.
    pub max_requests: u32,
    /// User-facing rejection text.
    pub message: &'static str,
}

impl RateLimitPolicy {
    /// Policy covering every route under `/api`.
    pub fn general(config: &RateLimitPolicyConfig) -> Self {
        Self {
            name: "general",
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            message: "Слишком много запросов. Попробуйте позже.",
        }
    }

    /// Policy covering the submit-application route.
    pub fn submission(config: &RateLimitPolicyConfig) -> Self {
        Self {
            name: "submission",
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            message: "Слишком много заявок с вашего адреса. Попробуйте позже.",
        }
    }
}

/// One client's fixed window.
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Fixed-window counters for one policy, keyed by client IP.
///
/// Each route class owns its own instance; windows of different
/// policies never interact. Entries are created lazily and recycled
/// in place when their window elapses.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Admit or reject one request from `client`.
    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        // The map entry holds its shard lock for the whole
        // read-increment-compare, so concurrent requests from one
        // client cannot jointly exceed the limit.
        let mut window = self.windows.entry(client).or_insert_with(|| Window {
            count: 0,
            reset_at: now + self.policy.window,
        });

        if now >= window.reset_at {
            window.count = 0;
            window.reset_at = now + self.policy.window;
        }

        let allowed = window.count < self.policy.max_requests;
        if allowed {
            window.count += 1;
        }

        Decision {
            allowed,
            limit: self.policy.max_requests,
            remaining: self.policy.max_requests.saturating_sub(window.count),
            reset_after: window.reset_at.saturating_duration_since(now),
        }
    }
}

/// Middleware enforcing one limiter instance.
///
/// Rejected requests are answered immediately; the handler chain
/// behind this layer is never invoked for them.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let decision = limiter.check(addr.ip());

    if decision.allowed {
        let mut response = next.run(request).await;
        apply_headers(&mut response, &decision);
        return response;
    }

    tracing::warn!(
        client = %addr.ip(),
        policy = limiter.policy().name,
        "Rate limit exceeded"
    );
    metrics::record_rate_limited(limiter.policy().name);

    let body = Json(json!({
        "success": false,
        "error": limiter.policy().message,
    }));
    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    apply_headers(&mut response, &decision);
    if let Ok(value) = HeaderValue::from_str(&reset_secs(&decision).to_string()) {
        response.headers_mut().insert(HEADER_RETRY_AFTER, value);
    }
    response
}

fn apply_headers(response: &mut Response, decision: &Decision) {
    let headers = response.headers_mut();
    // An inner, stricter policy may have stamped the response already;
    // its quota is the one the client needs to see.
    if headers.contains_key(HEADER_LIMIT) {
        return;
    }
    let pairs = [
        (HEADER_LIMIT, decision.limit.to_string()),
        (HEADER_REMAINING, decision.remaining.to_string()),
        (HEADER_RESET, reset_secs(decision).to_string()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}

fn reset_secs(decision: &Decision) -> u64 {
    // Round up so "Retry-After: 0" never accompanies a rejection.
    decision.reset_after.as_secs() + u64::from(decision.reset_after.subsec_nanos() > 0)
}
