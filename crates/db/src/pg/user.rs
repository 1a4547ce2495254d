use agenda_core::domain::{PasswordValidationInfo, Token, TokenValidationInfo, User};
use agenda_core::types::{DbId, Timestamp};
use async_trait::async_trait;

use super::models::{UserRow, UserTokenRow, USER_COLUMNS};
use super::PgTransaction;
use crate::error::RepoError;
use crate::repositories::{Repository, UserRepository};

#[async_trait]
impl Repository<User> for PgTransaction {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_all(&mut self) -> Result<Vec<User>, RepoError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn save(&mut self, entity: &User) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_validation)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password_validation = EXCLUDED.password_validation",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.email)
        .bind(entity.password_validation.as_str())
        .execute(&mut *self.conn)
        .await?;
        self.sync_id_sequence("users").await
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM tokens")
            .execute(&mut *self.conn)
            .await?;
        sqlx::query("DELETE FROM users")
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgTransaction {
    async fn create_user(
        &mut self,
        name: &str,
        email: &str,
        password_validation: &PasswordValidationInfo,
    ) -> Result<User, RepoError> {
        let query = format!(
            "INSERT INTO users (name, email, password_validation)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(name)
            .bind(email)
            .bind(password_validation.as_str())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(row.into())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(User::from))
    }

    async fn create_token(&mut self, token: Token, max_tokens: usize) -> Result<(), RepoError> {
        let keep = i64::try_from(max_tokens.saturating_sub(1)).unwrap_or(i64::MAX);
        sqlx::query(
            "DELETE FROM tokens WHERE token_validation IN (
                SELECT token_validation FROM tokens
                WHERE user_id = $1
                ORDER BY last_used_at DESC
                OFFSET $2
             )",
        )
        .bind(token.user_id)
        .bind(keep)
        .execute(&mut *self.conn)
        .await?;

        sqlx::query(
            "INSERT INTO tokens (token_validation, user_id, created_at, last_used_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(token.validation_info.as_str())
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.last_used_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    async fn get_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<Option<(User, Token)>, RepoError> {
        let row = sqlx::query_as::<_, UserTokenRow>(
            "SELECT u.id, u.name, u.email, u.password_validation,
                    t.token_validation, t.created_at, t.last_used_at
             FROM tokens t JOIN users u ON u.id = t.user_id
             WHERE t.token_validation = $1",
        )
        .bind(info.as_str())
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update_token_last_used(
        &mut self,
        token: &Token,
        now: Timestamp,
    ) -> Result<(), RepoError> {
        sqlx::query("UPDATE tokens SET last_used_at = $2 WHERE token_validation = $1")
            .bind(token.validation_info.as_str())
            .bind(now)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn remove_token_by_validation_info(
        &mut self,
        info: &TokenValidationInfo,
    ) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token_validation = $1")
            .bind(info.as_str())
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected())
    }
}
