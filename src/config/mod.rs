//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_URL: &str = "sqlite://catalog.db";
const DEFAULT_DOCUMENT_STORE_PATH: &str = "products.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit log lines as JSON objects instead of human-readable text
    pub log_json: bool,

    /// Relational store connection string
    pub database_url: String,
    /// Pool size for the relational store
    pub database_max_connections: u32,
    /// Datafile of the document store
    pub document_store_path: PathBuf,

    /// Allowed client origins for CORS (comma-separated), any origin when unset
    pub client_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // PORT wins over SERVER_ADDR so hosted deployments can pick the port
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                None | Some("") | Some("text") => false,
                Some("json") => true,
                Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
            },

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            document_store_path: lookup("DOCUMENT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_STORE_PATH)),

            client_origin: lookup("CLIENT_ORIGIN").filter(|s| !s.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            log_level: "info".to_string(),
            log_json: false,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            document_store_path: PathBuf::from(DEFAULT_DOCUMENT_STORE_PATH),
            client_origin: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.database_url, "sqlite://catalog.db");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.document_store_path, PathBuf::from("products.db"));
        assert!(config.client_origin.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn log_format_selects_json_output() {
        assert!(config_from(&[("LOG_FORMAT", "json")]).unwrap().log_json);
        assert!(!config_from(&[("LOG_FORMAT", "text")]).unwrap().log_json);
        assert!(matches!(
            config_from(&[("LOG_FORMAT", "yaml")]),
            Err(ConfigError::Invalid("LOG_FORMAT"))
        ));
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = config_from(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config_from(&[("SERVER_ADDR", "not an address")]),
            Err(ConfigError::InvalidAddress)
        ));
        assert!(matches!(
            config_from(&[("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))
        ));
    }

    #[test]
    fn blank_client_origin_is_unset() {
        let config = config_from(&[("CLIENT_ORIGIN", "  ")]).unwrap();
        assert!(config.client_origin.is_none());
    }
}
