//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. Binaries call `dotenvy::dotenv()` first, so a `.env` file works too.
//!
//! ## Required Variables
//!
//! - `DB_USER`, `DB_PASSWORD`, `DB_NAME` - database credentials
//! - `TOKEN_SIGNING_SECRET` - HMAC key for bearer tokens, at least 32 bytes
//!
//! ## Optional Variables
//!
//! - `DB_ADDRESS` - `host:port` of PostgreSQL (default: `localhost:5432`)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 10)
//! - `DB_OPERATION_TIMEOUT` - per-operation timeout in seconds (default: 5)
//! - `LISTEN` - bind address (default: `0.0.0.0:3000`)
//! - `BASE_URL` - prefix for published short URLs (default: `http://localhost:3000`)
//! - `RUST_LOG` - log filter (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `TOKEN_TTL_SECONDS` - bearer token lifetime (default: 86400)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;

use crate::application::services::AuthConfig;
use crate::infrastructure::persistence::ConnectionSettings;

/// Shortest accepted token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Database part of the configuration.
///
/// Split out so the admin binary can load it without the server settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub address: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    /// Per-operation timeout in seconds.
    pub operation_timeout: u64,
}

impl DatabaseConfig {
    /// Loads `DB_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or a number does not parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            address: env::var("DB_ADDRESS").unwrap_or_else(|_| "localhost:5432".to_string()),
            user: env::var("DB_USER").context("DB_USER must be set")?,
            password: env::var("DB_PASSWORD").context("DB_PASSWORD must be set")?,
            name: env::var("DB_NAME").context("DB_NAME must be set")?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            operation_timeout: parse_var("DB_OPERATION_TIMEOUT", 5)?,
        })
    }

    /// Validates pool settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool size or the timeout is zero, or if the
    /// address or database name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            anyhow::bail!("DB_ADDRESS must not be empty");
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("DB_NAME must not be empty");
        }
        if self.max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.operation_timeout == 0 {
            anyhow::bail!("DB_OPERATION_TIMEOUT must be greater than 0");
        }
        Ok(())
    }

    /// Settings handed to [`crate::infrastructure::persistence::PgStore::connect`].
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            address: self.address.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            database: self.name.clone(),
            max_connections: self.max_connections,
            operation_timeout: Duration::from_secs(self.operation_timeout),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub listen_addr: String,
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// HMAC key for bearer tokens. Never logged.
    pub token_signing_secret: String,
    pub token_ttl_seconds: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        let database =
            DatabaseConfig::from_env().context("Failed to load database configuration")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let token_signing_secret =
            env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
        let token_ttl_seconds = parse_var("TOKEN_TTL_SECONDS", 86_400)?;

        Ok(Self {
            database,
            listen_addr,
            base_url,
            log_level,
            log_format,
            token_signing_secret,
            token_ttl_seconds,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - database settings are invalid (see [`DatabaseConfig::validate`])
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `base_url` is not an absolute http(s) URL
    /// - the signing secret is shorter than [`MIN_SECRET_LEN`] bytes
    /// - the token lifetime is not in `1..=MAX_TOKEN_TTL_SECONDS`
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let base_url = url::Url::parse(&self.base_url)
            .with_context(|| format!("BASE_URL is not a valid URL: '{}'", self.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("BASE_URL must use http or https, got '{}'", self.base_url);
        }

        if self.token_signing_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("TOKEN_SIGNING_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }

        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&self.token_ttl_seconds) {
            anyhow::bail!(
                "TOKEN_TTL_SECONDS must be between 1 and {MAX_TOKEN_TTL_SECONDS}, got {}",
                self.token_ttl_seconds
            );
        }

        Ok(())
    }

    /// Settings for the auth resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lifetime does not fit a [`TimeDelta`].
    pub fn auth_config(&self) -> Result<AuthConfig> {
        let token_ttl = TimeDelta::try_seconds(self.token_ttl_seconds).with_context(|| {
            format!("TOKEN_TTL_SECONDS is out of range: {}", self.token_ttl_seconds)
        })?;

        Ok(AuthConfig {
            signing_secret: self.token_signing_secret.clone(),
            token_ttl,
        })
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!(
            "  Database: {}",
            self.database.connection_settings().redacted_uri()
        );
        tracing::info!(
            "  Pool: {} connections, {}s operation timeout",
            self.database.max_connections,
            self.database.operation_timeout
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Token lifetime: {}s", self.token_ttl_seconds);
    }
}

/// Reads an optional numeric variable.
///
/// Unlike a silent fallback, a set but unparseable value is an error.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
