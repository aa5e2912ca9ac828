//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::constants::{
    DEFAULT_CODEFORCES_API_BASE, DEFAULT_CODEFORCES_PROBLEMSET_URL,
    DEFAULT_CODEFORCES_TIMEOUT_SECONDS, DEFAULT_MAX_MINUTES_PER_ROUND, DEFAULT_MAX_PROBLEMS,
    DEFAULT_MIN_PROBLEMS, DEFAULT_PENDING_AUTH_FILE, DEFAULT_RECENCY_CUTOFF,
    DEFAULT_ROUND_POINTS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SUBMISSION_COUNT,
    DEFAULT_USER_DATA_FILE, DEFAULT_VERIFY_SUBMISSION_COUNT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub codeforces: CodeforcesConfig,
    pub duel: DuelConfig,
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Codeforces API configuration
#[derive(Debug, Clone)]
pub struct CodeforcesConfig {
    /// API base URL, e.g. `https://codeforces.com/api/`
    pub api_base: String,
    /// Base URL for problem links
    pub problemset_url: String,
    pub timeout_seconds: u64,
    /// Recent submissions scanned per round check
    pub submission_count: u32,
    /// Recent submissions scanned per handle verification
    pub verify_submission_count: u32,
}

/// Duel rules
#[derive(Debug, Clone)]
pub struct DuelConfig {
    pub min_problems: u32,
    pub max_problems: u32,
    /// Points for a round whose problem has no rating
    pub default_points: u32,
    /// Contests starting before this are excluded from selection
    pub recency_cutoff: DateTime<Utc>,
    pub max_minutes_per_round: u32,
}

/// File storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub user_data_file: PathBuf,
    pub pending_auth_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            codeforces: CodeforcesConfig::from_env()?,
            duel: DuelConfig::from_env()?,
            storage: StorageConfig::from_env(),
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl CodeforcesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut api_base = env::var("CODEFORCES_API_BASE")
            .unwrap_or_else(|_| DEFAULT_CODEFORCES_API_BASE.to_string());
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        Ok(Self {
            api_base,
            problemset_url: env::var("CODEFORCES_PROBLEMSET_URL")
                .unwrap_or_else(|_| DEFAULT_CODEFORCES_PROBLEMSET_URL.to_string()),
            timeout_seconds: parse_var(
                "CODEFORCES_TIMEOUT_SECONDS",
                DEFAULT_CODEFORCES_TIMEOUT_SECONDS,
            )?,
            submission_count: parse_var("CODEFORCES_SUBMISSION_COUNT", DEFAULT_SUBMISSION_COUNT)?,
            verify_submission_count: parse_var(
                "CODEFORCES_VERIFY_SUBMISSION_COUNT",
                DEFAULT_VERIFY_SUBMISSION_COUNT,
            )?,
        })
    }
}

impl DuelConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let cutoff = env::var("DUEL_RECENCY_CUTOFF")
            .unwrap_or_else(|_| DEFAULT_RECENCY_CUTOFF.to_string());
        let recency_cutoff = DateTime::parse_from_rfc3339(&cutoff)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ConfigError::InvalidValue("DUEL_RECENCY_CUTOFF".to_string()))?;

        let config = Self {
            min_problems: parse_var("DUEL_MIN_PROBLEMS", DEFAULT_MIN_PROBLEMS)?,
            max_problems: parse_var("DUEL_MAX_PROBLEMS", DEFAULT_MAX_PROBLEMS)?,
            default_points: parse_var("DUEL_DEFAULT_POINTS", DEFAULT_ROUND_POINTS)?,
            recency_cutoff,
            max_minutes_per_round: parse_var(
                "DUEL_MAX_MINUTES_PER_ROUND",
                DEFAULT_MAX_MINUTES_PER_ROUND,
            )?,
        };

        if config.min_problems == 0 || config.min_problems > config.max_problems {
            return Err(ConfigError::InvalidValue("DUEL_MIN_PROBLEMS".to_string()));
        }

        Ok(config)
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            min_problems: DEFAULT_MIN_PROBLEMS,
            max_problems: DEFAULT_MAX_PROBLEMS,
            default_points: DEFAULT_ROUND_POINTS,
            recency_cutoff: DateTime::parse_from_rfc3339(DEFAULT_RECENCY_CUTOFF)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            max_minutes_per_round: DEFAULT_MAX_MINUTES_PER_ROUND,
        }
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            user_data_file: PathBuf::from(
                env::var("USER_DATA_FILE").unwrap_or_else(|_| DEFAULT_USER_DATA_FILE.to_string()),
            ),
            pending_auth_file: PathBuf::from(
                env::var("PENDING_AUTH_FILE")
                    .unwrap_or_else(|_| DEFAULT_PENDING_AUTH_FILE.to_string()),
            ),
        }
    }
}

/// Read an environment variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_duel_defaults() {
        let duel = DuelConfig::default();
        assert_eq!(duel.min_problems, 1);
        assert_eq!(duel.max_problems, 10);
        assert_eq!(duel.default_points, 1000);
        assert_eq!(duel.recency_cutoff.timestamp(), 1_577_836_800);
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("CPDUEL_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
