//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SiteConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the effective configuration: file (or defaults), then environment
/// overlay, then validation.
pub fn load(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => SiteConfig::default(),
    };

    let config = apply_env_overrides(config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a parsed configuration.
///
/// `PORT` rewrites the listener port; `SUPABASE_URL` / `SUPABASE_KEY` fill
/// the persistence section when the file left it unset. Values already set
/// in the file win over the environment, except `PORT` which always wins
/// (platforms like Heroku and Vercel inject it).
pub fn apply_env_overrides(mut config: SiteConfig) -> SiteConfig {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                let host = config
                    .listener
                    .bind_address
                    .rsplit_once(':')
                    .map(|(host, _)| host.to_string())
                    .unwrap_or_else(|| "0.0.0.0".to_string());
                config.listener.bind_address = format!("{}:{}", host, port);
            }
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring unparseable PORT variable");
            }
        }
    }

    if config.supabase.url.is_none() {
        config.supabase.url = std::env::var("SUPABASE_URL").ok();
    }
    if config.supabase.service_key.is_none() {
        config.supabase.service_key = std::env::var("SUPABASE_KEY").ok();
    }
    if let Ok(key) = std::env::var("ADMIN_API_KEY") {
        config.admin.api_key = key;
    }

    config
}
