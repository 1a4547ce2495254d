use serde::Serialize;

use crate::config::UsersDomainConfig;
use crate::types::{DbId, Timestamp};

/// Opaque hashed representation of a password. Never the raw password.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PasswordValidationInfo(String);

impl PasswordValidationInfo {
    pub fn new(info: impl Into<String>) -> Self {
        Self(info.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque hash of a raw bearer token value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenValidationInfo(String);

impl TokenValidationInfo {
    pub fn new(info: impl Into<String>) -> Self {
        Self(info.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered user.
///
/// The password artifact is skipped on serialization so a `User` can be
/// rendered directly in responses and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_validation: PasswordValidationInfo,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub validation_info: TokenValidationInfo,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub last_used_at: Timestamp,
}

impl Token {
    /// Whether the token is inside both its absolute and rolling windows.
    pub fn is_time_valid(&self, now: Timestamp, config: &UsersDomainConfig) -> bool {
        self.created_at <= now
            && now - self.created_at <= config.token_ttl
            && now - self.last_used_at <= config.token_rolling_ttl
    }

    /// The earlier of the absolute and rolling expiration horizons.
    pub fn expiration(&self, config: &UsersDomainConfig) -> Timestamp {
        let absolute = self.created_at + config.token_ttl;
        let rolling = self.last_used_at + config.token_rolling_ttl;
        absolute.min(rolling)
    }
}

/// What a client receives on login: the raw token and when it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExternalInfo {
    pub token_value: String,
    pub token_expiration: Timestamp,
}
