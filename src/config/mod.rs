//! Environment-driven configuration.
//!
//! [`AppConfig::load`] reads a `.env` file when present and then the process
//! environment. [`AppConfig::from_lookup`] applies the same parsing to any
//! key lookup, which keeps tests away from global state.

use crate::filing::{
    domain::{AcknowledgementPrefix, FilingDomainError},
    services::{AcknowledgementSettings, DEFAULT_ACKNOWLEDGEMENT_ATTEMPTS},
};
use std::env;
use std::num::ParseIntError;
use thiserror::Error;

/// Deployment stage selector.
pub const ENV_VAR: &str = "TAXFLOW_ENV";
/// Default tracing filter when `RUST_LOG` is unset.
pub const LOG_LEVEL_VAR: &str = "TAXFLOW_LOG_LEVEL";
/// PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Maximum connections in the database pool.
pub const POOL_SIZE_VAR: &str = "TAXFLOW_DB_POOL_SIZE";
/// Leading letters of issued acknowledgement numbers.
pub const ACK_PREFIX_VAR: &str = "TAXFLOW_ACK_PREFIX";
/// Attempts made to find an unused acknowledgement number.
pub const ACK_ATTEMPTS_VAR: &str = "TAXFLOW_ACK_MAX_ATTEMPTS";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_POOL_SIZE: u32 = 8;

/// Distinguishes runtime behaviour for different stages of the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    /// Local development.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Production deployment.
    Production,
}

impl AppEnvironment {
    /// Parses a stage name; unknown names fall back to development.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is absent.
    pub log_level: String,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection string; `None` runs without PostgreSQL.
    pub url: Option<String>,
    /// Maximum pool size.
    pub pool_size: u32,
}

/// Top-level configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment stage.
    pub environment: AppEnvironment,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Acknowledgement number generation.
    pub acknowledgement: AcknowledgementSettings,
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("{variable} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Offending variable.
        variable: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A numeric variable was zero.
    #[error("{variable} must be greater than zero")]
    Zero {
        /// Offending variable.
        variable: &'static str,
    },

    /// The acknowledgement prefix was rejected.
    #[error("TAXFLOW_ACK_PREFIX is invalid")]
    InvalidAcknowledgementPrefix(#[source] FilingDomainError),
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid variable.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = lookup(ENV_VAR)
            .as_deref()
            .map_or_else(AppEnvironment::default, AppEnvironment::parse);
        let log_level = lookup(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
        let pool_size = positive(POOL_SIZE_VAR, lookup(POOL_SIZE_VAR), DEFAULT_POOL_SIZE)?;
        let max_attempts = positive(
            ACK_ATTEMPTS_VAR,
            lookup(ACK_ATTEMPTS_VAR),
            DEFAULT_ACKNOWLEDGEMENT_ATTEMPTS,
        )?;
        let prefix = lookup(ACK_PREFIX_VAR)
            .map(AcknowledgementPrefix::new)
            .transpose()
            .map_err(ConfigError::InvalidAcknowledgementPrefix)?
            .unwrap_or_default();

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            database: DatabaseConfig {
                url: lookup(DATABASE_URL_VAR).filter(|url| !url.trim().is_empty()),
                pool_size,
            },
            acknowledgement: AcknowledgementSettings::new(prefix, max_attempts),
        })
    }
}

fn positive(variable: &'static str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    let parsed = value
        .trim()
        .parse::<u32>()
        .map_err(|source| ConfigError::InvalidNumber {
            variable,
            value: value.clone(),
            source,
        })?;
    if parsed == 0 {
        return Err(ConfigError::Zero { variable });
    }
    Ok(parsed)
}
