//! Persistence layer for the agenda.
//!
//! - [`repositories`] -- per-entity repository contracts.
//! - [`transaction`] -- the unit-of-work seam services run against.
//! - [`mem`] -- in-memory backing for tests and database-less runs.
//! - [`pg`] -- PostgreSQL backing over sqlx.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod mem;
pub mod pg;
pub mod repositories;
pub mod transaction;

pub use error::{RepoError, PARTICIPANTS_USER_SLOT_CONSTRAINT, USERS_EMAIL_CONSTRAINT};
pub use mem::MemTransactionManager;
pub use pg::PgTransactionManager;
pub use transaction::{Transaction, TransactionManager};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
