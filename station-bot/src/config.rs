//! Configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::directory::DEFAULT_WIKI_URL;
use crate::storage::RedisConfig;

/// Default Telegram long-poll timeout.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Errors from reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("environment variable {0} must be set")]
    Missing(String),

    /// A variable is set to something unusable
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Where progress is persisted.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Nothing configured; progress is lost on restart
    Memory,
    /// JSON file at this path
    File(PathBuf),
    Redis(RedisConfig),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_version: String,
    pub telegram_token: String,
    pub wiki_url: String,
    pub storage: StorageConfig,
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        Ok(Self {
            app_version: env.get_or("APP_VERSION", "dev"),
            telegram_token: env.require("TELEGRAM_TOKEN")?,
            wiki_url: env.get_or("WIKI_URL", DEFAULT_WIKI_URL),
            storage: storage_config(&env)?,
            poll_timeout_secs: env.parse_or("POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?,
        })
    }
}

fn storage_config<F: Fn(&str) -> Option<String>>(
    env: &Env<F>,
) -> Result<StorageConfig, ConfigError> {
    if let Some(host) = env.get("STATE_REDIS_HOST") {
        return Ok(StorageConfig::Redis(RedisConfig::new(
            host,
            env.require("STATE_REDIS_USERNAME")?,
            env.require("STATE_REDIS_PASSWORD")?,
        )));
    }

    if let Some(path) = env.get("STATE_FILE") {
        return Ok(StorageConfig::File(PathBuf::from(path)));
    }

    warn!("no state storage configured, progress will not survive a restart");
    Ok(StorageConfig::Memory)
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
    }

    fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                message: format!("{value:?}: {e}"),
            }),
        }
    }
}
