//! Configuration management for cashbook
//!
//! This module handles loading, validation, and management of
//! cashbook configuration from YAML files.

pub mod error;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the store file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Store file name (relative to data path)
    #[serde(default = "default_store_file")]
    pub store_file: String,
    /// Write every mutation back to the store file
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            store_file: default_store_file(),
            persist: true,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_store_file() -> String {
    "cashbook.json".to_string()
}

fn default_true() -> bool {
    true
}

/// Business settings used by the report builders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Owner's starting investment, equity baseline and ROI denominator
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,
    /// ISO 4217 code shown on every report
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Maximum gap between assets and liabilities + equity still considered balanced
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            currency: default_currency(),
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

fn default_initial_capital() -> Decimal {
    Decimal::from(350_000_000i64)
}

fn default_currency() -> String {
    "IDR".to_string()
}

fn default_balance_tolerance() -> Decimal {
    Decimal::ONE
}

/// A user known to the identity provider stand-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Bearer token presented by the client
    pub token: String,
    /// User id, also the profile id
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// "operator" or "viewer"
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "viewer".to_string()
}

/// Accepted role names
pub const ROLES: [&str; 2] = ["operator", "viewer"];

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Business settings
    #[serde(default)]
    pub business: BusinessConfig,
    /// Known users
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.store_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "data.store_file".to_string(),
            });
        }

        if self.business.initial_capital.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                field: "business.initial_capital".to_string(),
                reason: "Initial capital must not be negative".to_string(),
            });
        }

        let currency = &self.business.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidValue {
                field: "business.currency".to_string(),
                reason: "Currency must be a 3-letter uppercase ISO code".to_string(),
            });
        }

        if self.business.balance_tolerance <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "business.balance_tolerance".to_string(),
                reason: "Balance tolerance must be greater than 0".to_string(),
            });
        }

        let mut tokens = HashSet::new();
        for (i, user) in self.auth.users.iter().enumerate() {
            if user.token.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: format!("auth.users[{}].token", i),
                });
            }
            if user.id.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: format!("auth.users[{}].id", i),
                });
            }
            if !ROLES.contains(&user.role.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("auth.users[{}].role", i),
                    reason: format!("Role must be one of: {}", ROLES.join(", ")),
                });
            }
            if !tokens.insert(user.token.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("Duplicate token for user '{}'", user.id),
                });
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the store file
    pub fn store_path(&self) -> PathBuf {
        self.data.path.join(&self.data.store_file)
    }

    /// Find the user owning a bearer token
    pub fn user_by_token(&self, token: &str) -> Option<&UserConfig> {
        self.auth.users.iter().find(|u| u.token == token)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorCode;
    use std::io::Write;

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.business.initial_capital, Decimal::from(350_000_000i64));
        assert_eq!(config.business.currency, "IDR");
        assert!(!config.auth.users.is_empty());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.store_file, "cashbook.json");
        assert!(config.data.persist);
        assert_eq!(config.business.balance_tolerance, Decimal::ONE);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.store_path(), PathBuf::from("./data/cashbook.json"));
    }

    #[test]
    fn test_initial_capital_override() {
        let config = Config::from_yaml("business:\n  initial_capital: 1000000\n").unwrap();
        assert_eq!(config.business.initial_capital, Decimal::from(1_000_000i64));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_negative_capital_rejected() {
        let err = Config::from_yaml("business:\n  initial_capital: -5\n").unwrap_err();
        assert!(err.to_string().contains("business.initial_capital"));
    }

    #[test]
    fn test_bad_currency_rejected() {
        let err = Config::from_yaml("business:\n  currency: rupiah\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let yaml = "auth:\n  users:\n    - token: abc\n      id: u1\n      email: a@b.c\n      role: admin\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("auth.users[0].role"));
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let yaml = "auth:\n  users:\n    - token: abc\n      id: u1\n      email: a@b.c\n    - token: abc\n      id: u2\n      email: d@e.f\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::ValidationError);
    }

    #[test]
    fn test_user_by_token() {
        let yaml = "auth:\n  users:\n    - token: secret\n      id: u1\n      email: a@b.c\n      role: operator\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.user_by_token("secret").map(|u| u.id.as_str()), Some("u1"));
        assert!(config.user_by_token("other").is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/definitely/not/here.yaml")).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9000").unwrap();
        let config = Config::load(file.path().to_path_buf()).unwrap();
        assert_eq!(config.server.port, 9000);
    }
}
