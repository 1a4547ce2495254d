/// Unique constraint over `users.email`.
pub const USERS_EMAIL_CONSTRAINT: &str = "uq_users_email";

/// Unique constraint over `(participants.user_id, participants.time_slot_id)`.
pub const PARTICIPANTS_USER_SLOT_CONSTRAINT: &str = "uq_participants_user_slot";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Infrastructure failure of a repository or transaction.
///
/// Never a domain outcome: "not found" is `Ok(None)`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back into a domain value.
    #[error("Corrupt row: {0}")]
    Decode(String),
}

impl RepoError {
    /// Name of the unique constraint this error violated, if it is one.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            RepoError::Database(sqlx::Error::Database(db))
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                db.constraint()
            }
            _ => None,
        }
    }

    /// Whether this error is a violation of the named unique constraint.
    pub fn violates(&self, constraint: &str) -> bool {
        self.unique_violation() == Some(constraint)
    }
}
