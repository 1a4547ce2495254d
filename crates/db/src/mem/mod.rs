//! In-memory backing.
//!
//! One [`MemStore`] behind an async mutex is shared by every transaction of a
//! [`MemTransactionManager`]. A transaction holds the lock for its whole
//! lifetime and works on a copy of the store; commit writes the copy back,
//! anything else drops it. Transactions are therefore serialized, which
//! gives the same all-or-nothing semantics as the database backing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::RepoError;
use crate::repositories::{
    EventRepository, ParticipantRepository, TimeSlotRepository, UserRepository,
};
use crate::transaction::{Transaction, TransactionManager};

mod event;
mod participant;
mod time_slot;
mod user;

pub use event::RepositoryEventInMem;
pub use participant::RepositoryParticipantInMem;
pub use time_slot::RepositoryTimeSlotInMem;
pub use user::RepositoryUserInMem;

/// Every in-memory repository of one backing store.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    pub users: RepositoryUserInMem,
    pub events: RepositoryEventInMem,
    pub slots: RepositoryTimeSlotInMem,
    pub participants: RepositoryParticipantInMem,
}

#[derive(Debug, Clone, Default)]
pub struct MemTransactionManager {
    store: Arc<Mutex<MemStore>>,
}

impl MemTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionManager for MemTransactionManager {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepoError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemTransaction { guard, work }))
    }
}

/// A working copy of the store plus the lock that keeps it current.
pub struct MemTransaction {
    guard: OwnedMutexGuard<MemStore>,
    work: MemStore,
}

#[async_trait]
impl Transaction for MemTransaction {
    fn users(&mut self) -> &mut dyn UserRepository {
        &mut self.work.users
    }

    fn events(&mut self) -> &mut dyn EventRepository {
        &mut self.work.events
    }

    fn slots(&mut self) -> &mut dyn TimeSlotRepository {
        &mut self.work.slots
    }

    fn participants(&mut self) -> &mut dyn ParticipantRepository {
        &mut self.work.participants
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let MemTransaction { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        tracing::debug!("Discarding in-memory transaction");
        Ok(())
    }
}

/// Position of the entity with `id` in an id-keyed vector.
fn position_of<T>(items: &[T], id: i64, id_of: impl Fn(&T) -> i64) -> Option<usize> {
    items.iter().position(|item| id_of(item) == id)
}

/// Replace the element with the same id in place, or append it.
fn upsert<T: Clone>(items: &mut Vec<T>, entity: &T, id_of: impl Fn(&T) -> i64) {
    match position_of(items, id_of(entity), &id_of) {
        Some(index) => items[index] = entity.clone(),
        None => items.push(entity.clone()),
    }
}
