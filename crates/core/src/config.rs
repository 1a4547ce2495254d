use chrono::Duration;

/// Default size of raw bearer tokens (256 bits).
pub const DEFAULT_TOKEN_SIZE_BYTES: usize = 256 / 8;
/// Default absolute token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Default idle window in minutes before a token expires.
pub const DEFAULT_TOKEN_ROLLING_TTL_MINUTES: i64 = 60;
/// Default number of concurrently valid tokens per user.
pub const DEFAULT_MAX_TOKENS_PER_USER: usize = 3;
/// Default minimum password length (passwords must be longer than 4).
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 5;

/// Token and password policy consumed by the auth service.
///
/// The core never reads the environment; the binary builds this value and
/// hands it down.
#[derive(Debug, Clone)]
pub struct UsersDomainConfig {
    /// Length of the raw random token before encoding.
    pub token_size_in_bytes: usize,
    /// Maximum age of a token measured from its creation.
    pub token_ttl: Duration,
    /// Maximum idle time measured from the last authenticated use.
    pub token_rolling_ttl: Duration,
    /// Older tokens are evicted (least recently used first) past this count.
    pub max_tokens_per_user: usize,
    /// Passwords shorter than this are rejected as insecure.
    pub min_password_length: usize,
}

impl Default for UsersDomainConfig {
    fn default() -> Self {
        Self {
            token_size_in_bytes: DEFAULT_TOKEN_SIZE_BYTES,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            token_rolling_ttl: Duration::minutes(DEFAULT_TOKEN_ROLLING_TTL_MINUTES),
            max_tokens_per_user: DEFAULT_MAX_TOKENS_PER_USER,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}
