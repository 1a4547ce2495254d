use agenda_core::domain::{PasswordValidationInfo, Token, TokenValidationInfo, User};
use agenda_core::types::{DbId, Timestamp};
use async_trait::async_trait;

use super::upsert;
use crate::error::RepoError;
use crate::repositories::{Repository, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct RepositoryUserInMem {
    users: Vec<User>,
    tokens: Vec<Token>,
    last_id: DbId,
}

#[async_trait]
impl Repository<User> for RepositoryUserInMem {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<User>, RepoError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<User>, RepoError> {
        Ok(self.users.clone())
    }

    async fn save(&mut self, entity: &User) -> Result<(), RepoError> {
        upsert(&mut self.users, entity, |u| u.id);
        self.last_id = self.last_id.max(entity.id);
        Ok(())
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        self.users.retain(|u| u.id != id);
        self.tokens.retain(|t| t.user_id != id);
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        self.users.clear();
        self.tokens.clear();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for RepositoryUserInMem {
    async fn create_user(
        &mut self,
        name: &str,
        email: &str,
        password_validation: &PasswordValidationInfo,
    ) -> Result<User, RepoError> {
        self.last_id += 1;
        let user = User {
            id: self.last_id,
            name: name.to_string(),
            email: email.to_string(),
            password_validation: password_validation.clone(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_token(&mut self, token: Token, max_tokens: usize) -> Result<(), RepoError> {
        let mut owned: Vec<&Token> = self
            .tokens
            .iter()
            .filter(|t| t.user_id == token.user_id)
            .collect();
        if owned.len() >= max_tokens {
            owned.sort_by_key(|t| t.last_used_at);
            let evicted: Vec<TokenValidationInfo> = owned
                .iter()
                .take(owned.len() + 1 - max_tokens.max(1))
                .map(|t| t.validation_info.clone())
                .collect();
            self.tokens
                .retain(|t| !evicted.contains(&t.validation_info));
        }
        self.tokens.push(token);
        Ok(())
    }

    async fn get_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<Option<(User, Token)>, RepoError> {
        let Some(token) = self.tokens.iter().find(|t| &t.validation_info == info) else {
            return Ok(None);
        };
        Ok(self
            .users
            .iter()
            .find(|u| u.id == token.user_id)
            .map(|user| (user.clone(), token.clone())))
    }

    async fn update_token_last_used(
        &mut self,
        token: &Token,
        now: Timestamp,
    ) -> Result<(), RepoError> {
        if let Some(stored) = self
            .tokens
            .iter_mut()
            .find(|t| t.validation_info == token.validation_info)
        {
            stored.last_used_at = now;
        }
        Ok(())
    }

    async fn remove_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<u64, RepoError> {
        let before = self.tokens.len();
        self.tokens.retain(|t| &t.validation_info != info);
        Ok((before - self.tokens.len()) as u64)
    }
}
