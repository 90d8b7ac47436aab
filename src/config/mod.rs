//! Configuration module for the contact admin service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the contact directory; `/api/*` is forwarded here
    pub api_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human readable text
    pub log_json: bool,
    /// Timeout for every request sent to the directory
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = normalize_base_url(
            &env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        )?;

        let bind_addr = env::var("CONTACT_ADMIN_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CONTACT_ADMIN_BIND_ADDR: {}", e)))?;

        let log_level = env::var("CONTACT_ADMIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("CONTACT_ADMIN_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let timeout_secs: u64 = env::var("CONTACT_ADMIN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CONTACT_ADMIN_TIMEOUT_SECS: {}", e)))?;

        Ok(Self {
            api_url,
            bind_addr,
            log_level,
            log_json,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Trim trailing slashes and reject anything that is not an http(s) URL.
fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::Config(format!(
            "API_URL must start with http:// or https://, got {:?}",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("API_URL");
        env::remove_var("CONTACT_ADMIN_BIND_ADDR");
        env::remove_var("CONTACT_ADMIN_LOG_LEVEL");
        env::remove_var("CONTACT_ADMIN_LOG_FORMAT");
        env::remove_var("CONTACT_ADMIN_TIMEOUT_SECS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_url, "http://localhost:4000");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(
            normalize_base_url("https://directory.internal/").unwrap(),
            "https://directory.internal"
        );
        assert!(normalize_base_url("directory.internal").is_err());
    }
}
