//! TOML-based configuration for the customer service
//!
//! Settings live in a single TOML file (`customers.toml` by default). Secrets
//! are never written to the file itself: the file names the environment
//! variables that hold them.

use crate::db::DatabaseProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum length in bytes accepted for the token signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime, ten years in seconds
pub const MAX_JWT_EXPIRY: i64 = 10 * 365 * 24 * 60 * 60;

/// Root configuration structure loaded from customers.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` for humans, `json` for log shippers
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry: i64,

    #[serde(default)]
    pub password: PasswordConfig,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_jwt_expiry() -> i64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            jwt_expiry: default_jwt_expiry(),
            password: PasswordConfig::default(),
        }
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl PasswordConfig {
    /// Lowest cost argon2 accepts. Only for test suites.
    pub fn fast_for_tests() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `:memory:`, `memory`, or a SQLite file path
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/customers.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration text without validating it
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks values that would make the server unusable.
    ///
    /// Environment variables are not consulted here; see [`jwt_secret`](Self::jwt_secret).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.auth.jwt_expiry <= 0 || self.auth.jwt_expiry > MAX_JWT_EXPIRY {
            return Err(ConfigError::ValidationError(format!(
                "auth.jwt_expiry must be between 1 and {} seconds, got {}",
                MAX_JWT_EXPIRY, self.auth.jwt_expiry
            )));
        }

        if self.auth.jwt_secret_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret_env must name an environment variable".to_string(),
            ));
        }

        let password = &self.auth.password;
        if password.iterations == 0 || password.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "auth.password iterations and parallelism must be at least 1".to_string(),
            ));
        }
        if password.memory_kib < 8 * password.parallelism {
            return Err(ConfigError::ValidationError(format!(
                "auth.password.memory_kib must be at least {}",
                8 * password.parallelism
            )));
        }

        Ok(())
    }

    /// Get the value of an environment variable referenced in config
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Reads the signing secret from the configured environment variable.
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let name = &self.auth.jwt_secret_env;
        let secret = self
            .resolve_env(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.clone()))?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "{} must be at least {} bytes long",
                name, MIN_SECRET_LEN
            )));
        }

        Ok(secret)
    }

    /// Picks the storage backend.
    ///
    /// Turso wins when both of its environment variables are configured and
    /// set (requires the `turso` feature); otherwise `database.url` decides.
    pub fn database_provider(&self) -> Result<DatabaseProvider, ConfigError> {
        #[cfg(feature = "turso")]
        if let (Some(url_env), Some(token_env)) = (
            &self.database.turso_url_env,
            &self.database.turso_token_env,
        ) {
            let url = self
                .resolve_env(url_env)
                .ok_or_else(|| ConfigError::MissingEnvVar(url_env.clone()))?;
            let auth_token = self
                .resolve_env(token_env)
                .ok_or_else(|| ConfigError::MissingEnvVar(token_env.clone()))?;
            return Ok(DatabaseProvider::Turso { url, auth_token });
        }

        Ok(DatabaseProvider::from_url(&self.database.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"

[auth]
jwt_secret_env = "CUSTOMER_HUB_TEST_SECRET"
jwt_expiry = 900

[auth.password]
memory_kib = 4096
iterations = 3

[database]
url = ":memory:"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = AppConfig::parse(&create_test_config()).expect("Failed to parse config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.auth.jwt_expiry, 900);
        assert_eq!(config.auth.password.memory_kib, 4096);
        assert_eq!(config.auth.password.iterations, 3);
        assert_eq!(config.auth.password.parallelism, 1);
        assert_eq!(config.database_provider().unwrap(), DatabaseProvider::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
        assert_eq!(config.auth.jwt_expiry, 3600);
        assert_eq!(config.auth.password, PasswordConfig::default());
        assert_eq!(
            config.database_provider().unwrap(),
            DatabaseProvider::SQLite {
                path: "./data/customers.db".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = AppConfig::default();
        config.auth.jwt_expiry = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.jwt_expiry = 1_000_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = AppConfig::default();
        config.auth.jwt_expiry = MAX_JWT_EXPIRY;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.auth.password.iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_is_parse_error() {
        let result = AppConfig::parse("[server]\nlog_format = \"xml\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load("/definitely/not/here/customers.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(create_test_config().as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_jwt_secret_resolution() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret_env = "CUSTOMER_HUB_UNSET_SECRET_VAR".to_string();
        assert!(matches!(
            config.jwt_secret(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::set_var("CUSTOMER_HUB_SHORT_SECRET", "short");
            std::env::set_var(
                "CUSTOMER_HUB_LONG_SECRET",
                "test-secret-at-least-32-characters-long",
            );
        }

        config.auth.jwt_secret_env = "CUSTOMER_HUB_SHORT_SECRET".to_string();
        assert!(matches!(
            config.jwt_secret(),
            Err(ConfigError::ValidationError(_))
        ));

        config.auth.jwt_secret_env = "CUSTOMER_HUB_LONG_SECRET".to_string();
        assert_eq!(
            config.jwt_secret().unwrap(),
            "test-secret-at-least-32-characters-long"
        );
    }
}
