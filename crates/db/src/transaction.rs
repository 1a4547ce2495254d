//! Unit-of-work seam.
//!
//! A [`Transaction`] bundles one handle per repository for the lifetime of a
//! single unit of work. All reads and writes made through it either persist
//! together on [`Transaction::commit`] or not at all. Dropping a transaction
//! without committing discards its writes, so an early `return` or a `?` on
//! a failed query rolls back implicitly.

use async_trait::async_trait;

use crate::error::RepoError;
use crate::repositories::{
    EventRepository, ParticipantRepository, TimeSlotRepository, UserRepository,
};

#[async_trait]
pub trait Transaction: Send {
    fn users(&mut self) -> &mut dyn UserRepository;

    fn events(&mut self) -> &mut dyn EventRepository;

    fn slots(&mut self) -> &mut dyn TimeSlotRepository;

    fn participants(&mut self) -> &mut dyn ParticipantRepository;

    /// Persist every write made through this transaction.
    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    /// Discard every write made through this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}

/// Opens transactions against one backing store.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepoError>;
}
