//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so an empty (or absent) config file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the site server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address, TLS, body limits).
    pub listener: ListenerConfig,

    /// Static site layout (web root, page files).
    pub site: StaticSiteConfig,

    /// Security gate lists and header hardening.
    pub security: SecurityConfig,

    /// Per-IP fixed-window rate limits.
    pub rate_limit: RateLimitConfig,

    /// Bounded in-memory request log.
    pub activity_log: ActivityLogConfig,

    /// Admin API authentication.
    pub admin: AdminConfig,

    /// Server-side lead persistence (Supabase REST).
    pub supabase: SupabaseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000"). The `PORT` environment
    /// variable overrides the port portion at load time.
    pub bind_address: String,

    /// Optional TLS configuration. When absent the server speaks plain HTTP.
    pub tls: Option<TlsConfig>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
            max_body_bytes: 10 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Static site layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticSiteConfig {
    /// Directory whitelisted assets are served from.
    pub root: PathBuf,

    /// Landing page file, served on `/` and as the 404 body.
    pub landing_page: String,

    /// Admin page file, served on `/admin`.
    pub admin_page: String,
}

impl Default for StaticSiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            landing_page: "index.html".to_string(),
            admin_page: "admin.html".to_string(),
        }
    }
}

/// Security gate lists and response hardening.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Attach hardening headers to every response.
    pub enable_headers: bool,

    /// File extensions that are always rejected with 403.
    pub blocked_extensions: Vec<String>,

    /// Path segments that are always rejected with 403 (exact,
    /// case-insensitive match per segment).
    pub blocked_segments: Vec<String>,

    /// File extensions permitted to be served from the web root.
    pub allowed_extensions: Vec<String>,

    /// Literal paths permitted to be served regardless of extension.
    pub allowed_paths: Vec<String>,

    /// Application routes exempt from the block lists.
    pub allowed_routes: Vec<String>,

    /// Route prefixes exempt from the block lists.
    pub allowed_route_prefixes: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            blocked_extensions: [
                ".js", ".json", ".env", ".md", ".yml", ".yaml", ".sql", ".db", ".txt", ".xml",
                ".conf", ".config",
            ]
            .map(str::to_string)
            .to_vec(),
            blocked_segments: [
                "node_modules",
                ".git",
                ".env",
                ".well-known",
                "package",
                "server",
                "admin.html",
                "index.html",
                "script",
                "admin",
            ]
            .map(str::to_string)
            .to_vec(),
            allowed_extensions: [
                ".css", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".woff", ".woff2",
                ".ttf", ".eot",
            ]
            .map(str::to_string)
            .to_vec(),
            allowed_paths: ["/output.css", "/styles.css"].map(str::to_string).to_vec(),
            allowed_routes: [
                "/",
                "/admin",
                "/healthz",
                "/api/config",
                "/api/logs",
                "/api/contact",
            ]
            .map(str::to_string)
            .to_vec(),
            allowed_route_prefixes: ["/.well-known"].map(str::to_string).to_vec(),
        }
    }
}

/// One fixed rate-limit window.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Requests permitted per window per client IP.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Fixed message returned with the 429.
    pub message: String,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// General limiter, applied to every request.
    pub general: WindowConfig,

    /// Stricter limiter, applied only to `/admin`.
    pub admin: WindowConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general: WindowConfig {
                max_requests: 100,
                window_secs: 15 * 60,
                message: "Too many requests, please try again later".to_string(),
            },
            admin: WindowConfig {
                max_requests: 30,
                window_secs: 5 * 60,
                message: "Admin access too frequent".to_string(),
            },
        }
    }
}

/// Activity log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActivityLogConfig {
    /// Maximum entries held in memory; oldest evicted past this.
    pub capacity: usize,

    /// Maximum entries returned by the logs API.
    pub api_page_size: usize,
}

impl Default for ActivityLogConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            api_page_size: 50,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token required by the logs API.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

/// Supabase REST persistence configuration.
///
/// `SUPABASE_URL` and `SUPABASE_KEY` environment variables populate the
/// url/key fields at load time when the file leaves them unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., "https://xyz.supabase.co").
    pub url: Option<String>,

    /// API key used for inserts.
    pub service_key: Option<String>,

    /// Target table for contact submissions.
    pub table: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: "contact_submissions".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Non-secret values surfaced to the browser by `GET /api/config`.
///
/// Re-read from the environment on every request; absent variables
/// serialize as `null`. No caching by design.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PublicRuntimeConfig {
    pub clerk_publishable_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub instagram_url: Option<String>,
    pub whatsapp_number: Option<String>,
}

impl PublicRuntimeConfig {
    /// Snapshot the relevant environment variables.
    pub fn from_env() -> Self {
        Self {
            clerk_publishable_key: std::env::var("CLERK_PUBLISHABLE_KEY").ok(),
            supabase_url: std::env::var("SUPABASE_URL").ok(),
            supabase_key: std::env::var("SUPABASE_KEY").ok(),
            instagram_url: std::env::var("INSTAGRAM_URL").ok(),
            whatsapp_number: std::env::var("WHATSAPP_NUMBER").ok(),
        }
    }
}
