//! Per-IP fixed-window rate limiting.
//!
//! Two independent limiters run in the middleware chain: a general one
//! covering every request and a stricter one that only counts requests
//! for `/admin`. Each is an injected store owned by the application
//! state. Counters are process-local and lost on restart; a
//! multi-instance deployment would have independent counters.

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::http::server::AppState;
use crate::observability::metrics;

/// One client's window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDecision {
    Allowed,
    /// Over quota; retry once the window rolls over.
    Limited { retry_after: Duration },
}

/// Fixed-window counter map keyed by client IP.
///
/// The counter resets at each window boundary: the first request seen
/// after the window elapses starts a fresh window.
pub struct FixedWindowLimiter {
    windows: DashMap<IpAddr, Window>,
    quota: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `quota` requests per `window` per IP.
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            quota,
            window,
        }
    }

    /// Count a request from `ip` against the current window.
    pub fn check(&self, ip: IpAddr) -> LimitDecision {
        self.check_at(ip, Instant::now())
    }

    /// Count a request at an explicit point in time.
    ///
    /// Factored out of [`check`](Self::check) so tests can drive the
    /// clock directly.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> LimitDecision {
        let mut entry = self.windows.entry(ip).or_insert(Window { started: now, count: 0 });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        if entry.count > self.quota {
            let retry_after = self.window.saturating_sub(now.duration_since(entry.started));
            LimitDecision::Limited { retry_after }
        } else {
            LimitDecision::Allowed
        }
    }
}

fn limited_response(message: &str, retry_after: Duration) -> Response {
    let mut response = (StatusCode::TOO_MANY_REQUESTS, message.to_string()).into_response();
    let secs = retry_after.as_secs().max(1);
    if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

/// Middleware: general limiter, applied to every request.
pub async fn general_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match state.general_limiter.check(addr.ip()) {
        LimitDecision::Allowed => next.run(request).await,
        LimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %addr.ip(), "General rate limit exceeded");
            metrics::record_rate_limited("general");
            limited_response(&state.config.rate_limit.general.message, retry_after)
        }
    }
}

/// Middleware: admin limiter, counted only for `/admin`.
pub async fn admin_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() != "/admin" {
        return next.run(request).await;
    }

    match state.admin_limiter.check(addr.ip()) {
        LimitDecision::Allowed => next.run(request).await,
        LimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %addr.ip(), "Admin rate limit exceeded");
            metrics::record_rate_limited("admin");
            limited_response(&state.config.rate_limit.admin.message, retry_after)
        }
    }
}
