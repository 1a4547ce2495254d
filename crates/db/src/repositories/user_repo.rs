use agenda_core::domain::{PasswordValidationInfo, Token, TokenValidationInfo, User};
use agenda_core::types::Timestamp;
use async_trait::async_trait;

use crate::error::RepoError;
use crate::repositories::Repository;

/// Users and their session tokens.
#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn create_user(
        &mut self,
        name: &str,
        email: &str,
        password_validation: &PasswordValidationInfo,
    ) -> Result<User, RepoError>;

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, RepoError>;

    /// Store `token`, first evicting the owner's least recently used tokens
    /// so that at most `max_tokens` remain afterwards.
    async fn create_token(&mut self, token: Token, max_tokens: usize) -> Result<(), RepoError>;

    /// The owning user together with the token, if the artifact is known.
    async fn get_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<Option<(User, Token)>, RepoError>;

    /// Refresh the last-used instant of the token with the same artifact.
    async fn update_token_last_used(
        &mut self,
        token: &Token,
        now: Timestamp,
    ) -> Result<(), RepoError>;

    /// Returns the number of removed tokens (0 or 1).
    async fn remove_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<u64, RepoError>;
}
