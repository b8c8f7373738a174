//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOCKROOM_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOCKROOM_HOST` - Bind address (default: 127.0.0.1)
//! - `STOCKROOM_PORT` - Listen port (default: 8080)
//! - `STOCKROOM_MOVEMENT_WINDOW_DAYS` - Default stock-movement window
//!   (default: 30)
//! - `STOCKROOM_ELEVATED_ROLES` - Comma-separated roles allowed to delete
//!   sales (default: admin)
//! - `STOCKROOM_LOG_JSON` - Emit JSON logs when set to `true`/`1`

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MOVEMENT_WINDOW_DAYS: u32 = 30;
const DEFAULT_ELEVATED_ROLES: &str = "admin";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Inventory server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Default trailing window for stock-movement analytics, in days
    pub movement_window_days: u32,
    /// Roles permitted to delete sales
    pub elevated_roles: Vec<String>,
    /// Emit logs as JSON instead of human-readable text
    pub log_json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOCKROOM_DATABASE_URL")?;
        let host = get_env_or_default("STOCKROOM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOCKROOM_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOCKROOM_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOCKROOM_PORT".to_string(), e.to_string())
            })?;
        let movement_window_days = match get_optional_env("STOCKROOM_MOVEMENT_WINDOW_DAYS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "STOCKROOM_MOVEMENT_WINDOW_DAYS".to_string(),
                    e.to_string(),
                )
            })?,
            None => DEFAULT_MOVEMENT_WINDOW_DAYS,
        };
        let elevated_roles = parse_role_list(&get_env_or_default(
            "STOCKROOM_ELEVATED_ROLES",
            DEFAULT_ELEVATED_ROLES,
        ));
        let log_json = get_optional_env("STOCKROOM_LOG_JSON")
            .is_some_and(|raw| matches!(raw.as_str(), "true" | "1"));

        Ok(Self {
            database_url,
            host,
            port,
            movement_window_days,
            elevated_roles,
            log_json,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the given role may perform elevated operations.
    #[must_use]
    pub fn is_elevated_role(&self, role: &str) -> bool {
        self.elevated_roles.iter().any(|allowed| allowed == role)
    }
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed
/// postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated role list, trimming whitespace and dropping
/// empty entries.
fn parse_role_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            movement_window_days: 30,
            elevated_roles: vec!["admin".to_string()],
            log_json: false,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_parse_role_list() {
        assert_eq!(parse_role_list("admin"), vec!["admin"]);
        assert_eq!(
            parse_role_list("admin, manager ,auditor"),
            vec!["admin", "manager", "auditor"]
        );
        assert_eq!(parse_role_list(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn test_is_elevated_role() {
        let mut config = test_config();
        config.elevated_roles = parse_role_list("admin,manager");

        assert!(config.is_elevated_role("admin"));
        assert!(config.is_elevated_role("manager"));
        assert!(!config.is_elevated_role("clerk"));
        assert!(!config.is_elevated_role(""));
    }
}
