//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (hardening headers on the way out)
//!     → rate_limit.rs (general per-IP window, then admin window)
//!     → gate.rs (traversal check, block lists, whitelist serve)
//!     → Pass to routes
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Deny rules are evaluated before allow rules
//! - Rejected requests short-circuit before the activity log
//! - No trust in client input: paths are percent-decoded before checks
//!   and re-verified against the web root after resolution

pub mod gate;
pub mod headers;
pub mod rate_limit;

pub use gate::{GateDecision, StaticGate};
pub use rate_limit::FixedWindowLimiter;
