//! Registration, login tokens and bearer-token resolution.

use std::sync::Arc;

use agenda_core::clock::Clock;
use agenda_core::config::UsersDomainConfig;
use agenda_core::domain::{PasswordValidationInfo, Token, TokenExternalInfo, User};
use agenda_core::error::{TokenCreationError, UserError};
use agenda_core::{password, token};
use agenda_db::{RepoError, TransactionManager, USERS_EMAIL_CONSTRAINT};

use crate::error::{failure, ServiceError};

pub struct UserAuthService {
    trx: Arc<dyn TransactionManager>,
    config: UsersDomainConfig,
    clock: Arc<dyn Clock>,
}

impl UserAuthService {
    pub fn new(
        trx: Arc<dyn TransactionManager>,
        config: UsersDomainConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { trx, config, clock }
    }

    pub fn config(&self) -> &UsersDomainConfig {
        &self.config
    }

    pub fn validate_password(&self, password: &str, info: &PasswordValidationInfo) -> bool {
        password::verify_password(password, info)
    }

    pub fn is_safe_password(&self, password: &str) -> bool {
        password::is_safe_password(password, self.config.min_password_length)
    }

    /// Register a new user.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError<UserError>> {
        if !self.is_safe_password(password) {
            return failure(UserError::InsecurePassword);
        }
        let password_validation = password::hash_password(password)
            .map_err(|e| ServiceError::PasswordHashing(e.to_string()))?;

        let mut tx = self.trx.begin().await?;
        if tx.users().find_by_email(email).await?.is_some() {
            return failure(UserError::AlreadyUsedEmailAddress);
        }
        let user = match tx
            .users()
            .create_user(name, email, &password_validation)
            .await
        {
            Ok(user) => user,
            // A concurrent registration won the race past the lookup above.
            Err(e) if e.violates(USERS_EMAIL_CONSTRAINT) => {
                return failure(UserError::AlreadyUsedEmailAddress)
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Log in: issue a fresh token for valid credentials.
    pub async fn create_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenExternalInfo, ServiceError<TokenCreationError>> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return failure(TokenCreationError::UserOrPasswordAreInvalid);
        }

        let mut tx = self.trx.begin().await?;
        let Some(user) = tx.users().find_by_email(email).await? else {
            return failure(TokenCreationError::UserOrPasswordAreInvalid);
        };
        if !self.validate_password(password, &user.password_validation) {
            return failure(TokenCreationError::UserOrPasswordAreInvalid);
        }

        let token_value = token::generate_token_value(self.config.token_size_in_bytes);
        let now = self.clock.now();
        let new_token = Token {
            validation_info: token::create_validation_information(&token_value),
            user_id: user.id,
            created_at: now,
            last_used_at: now,
        };
        let token_expiration = new_token.expiration(&self.config);
        tx.users()
            .create_token(new_token, self.config.max_tokens_per_user)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "Token issued");
        Ok(TokenExternalInfo {
            token_value,
            token_expiration,
        })
    }

    /// Remove the token with this raw value. Succeeds whether or not it existed.
    pub async fn revoke_token(&self, token_value: &str) -> Result<(), RepoError> {
        let validation_info = token::create_validation_information(token_value);
        let mut tx = self.trx.begin().await?;
        let removed = tx
            .users()
            .remove_token_by_validation_info(&validation_info)
            .await?;
        tx.commit().await?;

        tracing::debug!(removed, "Token revoked");
        Ok(())
    }

    /// Resolve a raw bearer token to its user, refreshing its last use.
    ///
    /// `Ok(None)` for malformed, unknown and expired tokens alike.
    pub async fn get_user_by_token(&self, token_value: &str) -> Result<Option<User>, RepoError> {
        if !token::can_be_token(token_value, self.config.token_size_in_bytes) {
            return Ok(None);
        }
        let validation_info = token::create_validation_information(token_value);

        let mut tx = self.trx.begin().await?;
        let Some((user, stored)) = tx
            .users()
            .get_token_by_validation_info(&validation_info)
            .await?
        else {
            return Ok(None);
        };
        let now = self.clock.now();
        if !stored.is_time_valid(now, &self.config) {
            return Ok(None);
        }
        tx.users().update_token_last_used(&stored, now).await?;
        tx.commit().await?;
        Ok(Some(user))
    }
}
