//! # Configuration Management for the Academy API
//!
//! This crate provides the configuration structures for the store backend and
//! the HTTP server.
//!
//! ## TOML File Configuration
//! ```toml
//! [database]
//! backend = "postgres"
//! host = "localhost"
//! port = 5432
//! database = "academy"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//! cors_origins = ["http://localhost:5173"]
//! ```
//!
//! A demo setup only needs `backend = "memory"` (plus an optional
//! `fixture_path`) under `[database]`; every other field has a default.
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from ACADEMY_CONFIG or ./academy.toml
//! let config = AppConfig::load()?;
//!
//! // Load a specific file, still honoring .env and DATABASE_URL
//! let config = AppConfig::load_from("academy.toml")?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./academy.toml";
const CONFIG_PATH_VAR: &str = "ACADEMY_CONFIG";
const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which store implementation serves the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Full connection URL; takes precedence over the individual fields
    pub url: Option<String>,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    /// JSON fixture loaded by the memory backend
    pub fixture_path: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            database: "academy".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            url: None,
            min_connections: 1,
            max_connections: 10,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
            max_lifetime_seconds: 3600,
            fixture_path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: [
                "http://localhost:5173",
                "http://localhost:4173",
                "http://localhost:5174",
                "http://localhost:3000",
            ]
            .iter()
            .map(|origin| origin.to_string())
            .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in the environment or the default path
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv()?;

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_from(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from `path`, applying `.env` and `DATABASE_URL`
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_dotenv()?;

        let mut config = Self::read_file(path)?;
        if let Ok(url) = env::var(DATABASE_URL_VAR) {
            config.database.url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// In-memory configuration with default server settings
    pub fn memory(fixture_path: Option<String>) -> Self {
        Self {
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                fixture_path,
                ..DatabaseConfig::default()
            },
            server: ServerConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == StoreBackend::Postgres {
            self.database.validate_postgres()?;
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "Server port cannot be zero".to_string(),
            ));
        }
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Server host cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// A missing .env file is fine; a malformed one is not
fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl DatabaseConfig {
    fn validate_postgres(&self) -> Result<(), ConfigError> {
        if self.url.as_deref().is_some_and(|url| !url.is_empty()) {
            return self.validate_pool();
        }

        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }

        self.validate_pool()
    }

    fn validate_pool(&self) -> Result<(), ConfigError> {
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.database
            ),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
