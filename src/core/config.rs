//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default base URL of the Seoul Open Data Plaza API.
pub const DEFAULT_SEOUL_API_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// Default timeout applied to every upstream request, in seconds.
pub const DEFAULT_SEOUL_API_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Seoul Open Data API access configuration.
    pub seoul_api: SeoulApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Access configuration for the Seoul Open Data Plaza API.
#[derive(Clone, Serialize, Deserialize)]
pub struct SeoulApiConfig {
    /// Scheme, host and port the request paths are appended to.
    pub base_url: String,

    /// Access key substituted into every request path.
    /// Issued at https://data.seoul.go.kr
    pub api_key: String,

    /// Upper bound for a single upstream request.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact the access key from logs.
impl std::fmt::Debug for SeoulApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeoulApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &if self.api_key.is_empty() { "" } else { "[REDACTED]" },
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SeoulApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEOUL_API_BASE_URL.to_string(),
            // Must be supplied by the deployment
            api_key: String::new(),
            timeout_secs: DEFAULT_SEOUL_API_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "seoul-data-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            seoul_api: SeoulApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_SEOUL_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        config.transport = TransportConfig::from_env();

        if let Ok(api_key) = std::env::var("MCP_SEOUL_API_KEY") {
            config.seoul_api.api_key = api_key;
            info!("Seoul Open API key loaded from environment");
        } else {
            warn!(
                "MCP_SEOUL_API_KEY not set - upstream requests will be sent without an access key \
                 (get one at https://data.seoul.go.kr)"
            );
        }

        if let Ok(base_url) = std::env::var("MCP_SEOUL_API_BASE_URL") {
            config.seoul_api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("MCP_SEOUL_API_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.seoul_api.timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid MCP_SEOUL_API_TIMEOUT_SECS value '{}', using {}s",
                    timeout, config.seoul_api.timeout_secs
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_seoul_api_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SEOUL_API_KEY", "test_key_12345");
            std::env::set_var("MCP_SEOUL_API_BASE_URL", "http://localhost:9999");
            std::env::set_var("MCP_SEOUL_API_TIMEOUT_SECS", "5");
        }
        let config = Config::from_env();
        assert_eq!(config.seoul_api.api_key, "test_key_12345");
        assert_eq!(config.seoul_api.base_url, "http://localhost:9999");
        assert_eq!(config.seoul_api.timeout_secs, 5);
        unsafe {
            std::env::remove_var("MCP_SEOUL_API_KEY");
            std::env::remove_var("MCP_SEOUL_API_BASE_URL");
            std::env::remove_var("MCP_SEOUL_API_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_seoul_api_default_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_SEOUL_API_KEY");
            std::env::set_var("MCP_SEOUL_API_TIMEOUT_SECS", "not-a-number");
        }
        let config = Config::from_env();
        assert_eq!(config.seoul_api.api_key, "");
        assert_eq!(config.seoul_api.base_url, DEFAULT_SEOUL_API_BASE_URL);
        assert_eq!(config.seoul_api.timeout_secs, DEFAULT_SEOUL_API_TIMEOUT_SECS);
        unsafe {
            std::env::remove_var("MCP_SEOUL_API_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let api = SeoulApiConfig {
            api_key: "super_secret_key".to_string(),
            ..Default::default()
        };
        let debug_str = format!("{:?}", api);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_config_default_server_name() {
        let config = Config::default();
        assert_eq!(config.server.name, "seoul-data-mcp-server");
        assert!(config.seoul_api.api_key.is_empty());
    }
}
