//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows > 0, capacities > 0, addresses parse)
//! - Check the TLS section is complete when present
//! - Check configured URLs are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{SiteConfig, WindowConfig};

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "rate_limit.general").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_window(errors: &mut Vec<ValidationError>, field: &str, window: &WindowConfig) {
    if window.max_requests == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "max_requests must be greater than zero".to_string(),
        });
    }
    if window.window_secs == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "window_secs must be greater than zero".to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: Option<&str>) {
    if let Some(raw) = value {
        if Url::parse(raw).is_err() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: format!("'{}' is not a valid URL", raw),
            });
        }
    }
}

/// Validate a parsed configuration, collecting every failure.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("'{}' is not a valid socket address", config.listener.bind_address),
        });
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError {
            field: "listener.max_body_bytes".to_string(),
            message: "max_body_bytes must be greater than zero".to_string(),
        });
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError {
                field: "listener.tls".to_string(),
                message: "cert_path and key_path must both be set".to_string(),
            });
        }
    }

    if config.site.root.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "site.root".to_string(),
            message: "static root must not be empty".to_string(),
        });
    }

    check_window(&mut errors, "rate_limit.general", &config.rate_limit.general);
    check_window(&mut errors, "rate_limit.admin", &config.rate_limit.admin);

    if config.activity_log.capacity == 0 {
        errors.push(ValidationError {
            field: "activity_log.capacity".to_string(),
            message: "capacity must be greater than zero".to_string(),
        });
    }
    if config.activity_log.api_page_size == 0 {
        errors.push(ValidationError {
            field: "activity_log.api_page_size".to_string(),
            message: "api_page_size must be greater than zero".to_string(),
        });
    }

    if config.admin.api_key.is_empty() {
        errors.push(ValidationError {
            field: "admin.api_key".to_string(),
            message: "api_key must not be empty".to_string(),
        });
    }

    check_url(&mut errors, "supabase.url", config.supabase.url.as_deref());

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
