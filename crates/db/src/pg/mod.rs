//! PostgreSQL backing.
//!
//! [`PgTransaction`] wraps one sqlx transaction and implements every
//! repository contract itself, so each repository accessor hands out the
//! same connection.

use async_trait::async_trait;
use sqlx::Postgres;

use crate::error::RepoError;
use crate::repositories::{
    EventRepository, ParticipantRepository, TimeSlotRepository, UserRepository,
};
use crate::transaction::{Transaction, TransactionManager};
use crate::DbPool;

mod event;
mod models;
mod participant;
mod time_slot;
mod user;

#[derive(Debug, Clone)]
pub struct PgTransactionManager {
    pool: DbPool,
}

impl PgTransactionManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepoError> {
        let conn = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { conn }))
    }
}

pub struct PgTransaction {
    conn: sqlx::Transaction<'static, Postgres>,
}

impl PgTransaction {
    /// Move `table`'s id sequence forward past the highest stored id. The
    /// sequence never moves backwards.
    async fn sync_id_sequence(&mut self, table: &'static str) -> Result<(), RepoError> {
        let query = format!(
            "SELECT setval(seq, GREATEST((SELECT MAX(id) FROM {table}), pg_sequence_last_value(seq), 1)) \
             FROM (SELECT pg_get_serial_sequence('{table}', 'id')::regclass AS seq) s"
        );
        sqlx::query(&query).execute(&mut *self.conn).await?;
        Ok(())
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn events(&mut self) -> &mut dyn EventRepository {
        self
    }

    fn slots(&mut self) -> &mut dyn TimeSlotRepository {
        self
    }

    fn participants(&mut self) -> &mut dyn ParticipantRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.conn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        tracing::debug!("Rolling back database transaction");
        self.conn.rollback().await?;
        Ok(())
    }
}
