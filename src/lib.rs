//! Marketing-site backend.
//!
//! A small hardened HTTP server for a static marketing site: security
//! middleware, a whitelisted static-file gate, a public config endpoint,
//! an admin activity-log API, and a server-side contact submission flow.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 SITE SERVER                    │
//!                    │                                                │
//!  Browser request   │  ┌─────────┐   ┌───────────┐   ┌───────────┐  │
//!  ──────────────────┼─▶│ headers │──▶│  limiters │──▶│ activity  │  │
//!                    │  │hardening│   │ (IP/window│   │   log     │  │
//!                    │  └─────────┘   │  counters)│   └─────┬─────┘  │
//!                    │                └───────────┘         │        │
//!                    │                                      ▼        │
//!                    │                              ┌──────────────┐ │
//!                    │                              │ static gate  │ │
//!                    │                              │ deny → allow │ │
//!                    │                              └──────┬───────┘ │
//!                    │                                     │         │
//!                    │          ┌──────────────────────────┼───────┐ │
//!                    │          ▼              ▼           ▼       │ │
//!  Browser response  │  ┌────────────┐ ┌────────────┐ ┌─────────┐ │ │
//!  ◀─────────────────┼──│ page/asset │ │ config/logs│ │ contact │◀┼─┼── Supabase
//!                    │  │  handlers  │ │    APIs    │ │  flow   │ │ │   (REST)
//!                    │  └────────────┘ └────────────┘ └─────────┘ │ │
//!                    │          └──────────────────────────────────┘ │
//!                    │                                                │
//!                    │  ┌──────────────────────────────────────────┐ │
//!                    │  │           Cross-Cutting Concerns          │ │
//!                    │  │  ┌────────┐ ┌─────────────┐ ┌──────────┐ │ │
//!                    │  │  │ config │ │observability│ │net (TLS, │ │ │
//!                    │  │  │        │ │ logs+metrics│ │ certgen) │ │ │
//!                    │  │  └────────┘ └─────────────┘ └──────────┘ │ │
//!                    │  └──────────────────────────────────────────┘ │
//!                    └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Request filtering and stores
pub mod contact;
pub mod security;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
