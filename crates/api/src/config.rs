use std::str::FromStr;

use agenda_core::config::{
    UsersDomainConfig, DEFAULT_MAX_TOKENS_PER_USER, DEFAULT_MIN_PASSWORD_LENGTH,
    DEFAULT_TOKEN_ROLLING_TTL_MINUTES, DEFAULT_TOKEN_SIZE_BYTES, DEFAULT_TOKEN_TTL_HOURS,
};
use chrono::Duration;

/// Default interval between heartbeats sent to event listeners.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 2;

/// A malformed environment variable.
#[derive(Debug, thiserror::Error)]
#[error("{key} must be {expected}, got {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default `0.0.0.0`).
    pub host: String,
    /// Listen port (default `8080`).
    pub port: u16,
    /// Allowed CORS origins (comma-separated in env).
    pub cors_origins: Vec<String>,
    /// Request timeout in seconds (default `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. Unset selects the in-memory backing.
    pub database_url: Option<String>,
    /// Heartbeat period for `/listen` streams (default `2`).
    pub keep_alive_secs: u64,
    /// Token and password policy.
    pub users: UsersDomainConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `8080`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `DATABASE_URL`              | unset                   |
    /// | `KEEP_ALIVE_SECS`           | `2`                     |
    /// | `TOKEN_SIZE_BYTES`          | `32`                    |
    /// | `TOKEN_TTL_HOURS`           | `24`                    |
    /// | `TOKEN_ROLLING_TTL_MINUTES` | `60`                    |
    /// | `MAX_TOKENS_PER_USER`       | `3`                     |
    /// | `MIN_PASSWORD_LENGTH`       | `5`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);
        let cors_origins = env
            .get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let users = UsersDomainConfig {
            token_size_in_bytes: env.positive("TOKEN_SIZE_BYTES", DEFAULT_TOKEN_SIZE_BYTES)?,
            token_ttl: Duration::hours(env.parse("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?),
            token_rolling_ttl: Duration::minutes(env.parse(
                "TOKEN_ROLLING_TTL_MINUTES",
                DEFAULT_TOKEN_ROLLING_TTL_MINUTES,
            )?),
            max_tokens_per_user: env.parse("MAX_TOKENS_PER_USER", DEFAULT_MAX_TOKENS_PER_USER)?,
            min_password_length: env.parse("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH)?,
        };

        Ok(Self {
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env.parse("PORT", 8080)?,
            cors_origins,
            request_timeout_secs: env.parse("REQUEST_TIMEOUT_SECS", 30)?,
            database_url: env.get("DATABASE_URL").filter(|s| !s.is_empty()),
            keep_alive_secs: env.positive("KEEP_ALIVE_SECS", DEFAULT_KEEP_ALIVE_SECS)?,
            users,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Read `key` and parse it, falling back to `default` when unset.
    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError {
                key,
                expected: "a non-negative integer",
                value,
            }),
            None => Ok(default),
        }
    }

    /// Like [`Env::parse`], but zero is rejected.
    fn positive<T: FromStr + Default + PartialEq>(
        &self,
        key: &'static str,
        default: T,
    ) -> Result<T, ConfigError> {
        let value = self.parse(key, default)?;
        if value == T::default() {
            return Err(ConfigError {
                key,
                expected: "a positive integer",
                value: "0".into(),
            });
        }
        Ok(value)
    }
}
