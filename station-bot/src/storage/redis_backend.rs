//! Redis state storage.
//!
//! The whole snapshot lives as JSON under a single key derived from the
//! Redis user name, so several bots can share one server.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use reqwest::Url;
use tracing::{debug, info};

use crate::progress::ProgressState;

use super::{StateStorage, StorageError};

/// Connection settings for the Redis backend.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Host name, optionally with `:port`
    pub host: String,
    pub username: String,
    pub password: String,
}

impl RedisConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Key holding the snapshot.
    pub fn key(&self) -> String {
        format!("{}:state", self.username)
    }

    /// Connection URL with credentials percent-encoded.
    fn url(&self) -> Result<Url, StorageError> {
        let invalid = |message: String| StorageError::Config { message };

        let mut url = Url::parse(&format!("redis://{}", self.host))
            .map_err(|e| invalid(format!("invalid redis host {:?}: {e}", self.host)))?;
        url.set_username(&self.username)
            .map_err(|_| invalid("redis URL cannot carry a username".to_string()))?;
        url.set_password(Some(&self.password))
            .map_err(|_| invalid("redis URL cannot carry a password".to_string()))?;
        Ok(url)
    }
}

/// Stores the snapshot in Redis.
///
/// A missing key loads as the empty state; a value that does not decode
/// is an error.
#[derive(Clone)]
pub struct RedisStorage {
    connection: ConnectionManager,
    key: String,
}

impl RedisStorage {
    /// Connect to the configured server.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StorageError> {
        let url = config.url()?;
        let client = redis::Client::open(url.as_str())?;
        let connection = client.get_connection_manager().await?;
        info!(host = %config.host, key = %config.key(), "connected to redis");

        Ok(Self {
            connection,
            key: config.key(),
        })
    }
}

impl StateStorage for RedisStorage {
    async fn load(&self) -> Result<ProgressState, StorageError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(&self.key).await?;

        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!(key = %self.key, "no state stored yet, starting empty");
                Ok(ProgressState::empty())
            }
        }
    }

    async fn store(&self, state: &ProgressState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        let mut connection = self.connection.clone();
        let _: () = connection.set(&self.key, json).await?;
        Ok(())
    }
}
