//! Bounded in-memory request activity log.
//!
//! One entry is appended per request for diagnostic viewing through the
//! admin logs API. The log is an explicitly owned store injected through
//! the application state, process-local, and lost on restart. A
//! multi-instance deployment would have independent, inconsistent logs.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::metrics;

/// One recorded request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// RFC 3339 timestamp of the request.
    pub timestamp: String,
    /// Client IP address.
    pub ip: String,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// User-Agent header, when present.
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

/// FIFO-bounded request log.
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityLogEntry>>,
    capacity: usize,
}

impl ActivityLog {
    /// Create a log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once past capacity.
    pub fn record(&self, entry: ActivityLogEntry) {
        let mut entries = self.entries.lock().expect("activity log mutex poisoned");
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The newest `n` entries, oldest-first.
    pub fn tail(&self, n: usize) -> Vec<ActivityLogEntry> {
        let entries = self.entries.lock().expect("activity log mutex poisoned");
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("activity log mutex poisoned").len()
    }

    /// True when no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Middleware: append one entry per request, then always continue.
///
/// Never rejects a request. Runs after the rate limiters, so rejected
/// requests are not logged.
pub async fn record_activity(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();

    state.activity.record(ActivityLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        ip: addr.ip().to_string(),
        method: method.clone(),
        path: request.uri().path().to_string(),
        user_agent: request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    });

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), started);
    response
}
