//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → activity.rs (bounded in-memory log entry)
//!     → metrics.rs (counters, histograms)
//!     → tracing events (structured logs via tower-http TraceLayer)
//!
//! Consumers:
//!     → Admin logs API (last N activity entries)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → Log aggregation (stdout: pretty in dev, JSON in production)
//! ```
//!
//! # Design Decisions
//! - The activity log is an injected store, not a process-wide global
//! - Metrics are cheap (atomic increments) and no-ops until installed
//! - Request IDs flow through all log events

pub mod activity;
pub mod metrics;

pub use activity::{ActivityLog, ActivityLogEntry};
