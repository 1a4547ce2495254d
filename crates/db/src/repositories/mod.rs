//! Repository contracts.
//!
//! Every entity repository extends [`Repository`] with entity-specific
//! creation and lookup methods. Repositories are reached through a
//! [`Transaction`](crate::Transaction), never constructed by services.

use agenda_core::types::DbId;
use async_trait::async_trait;

use crate::error::RepoError;

pub mod event_repo;
pub mod participant_repo;
pub mod time_slot_repo;
pub mod user_repo;

pub use event_repo::EventRepository;
pub use participant_repo::ParticipantRepository;
pub use time_slot_repo::TimeSlotRepository;
pub use user_repo::UserRepository;

/// CRUD operations shared by all entity repositories.
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send {
    /// `Ok(None)` when no entity has this id.
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<T>, RepoError>;

    async fn find_all(&mut self) -> Result<Vec<T>, RepoError>;

    /// Replace the entity with the same id, or insert it if absent.
    async fn save(&mut self, entity: &T) -> Result<(), RepoError>;

    /// No-op when the id is absent.
    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError>;

    /// Remove every entity. Intended for tests and resets.
    async fn clear(&mut self) -> Result<(), RepoError>;
}
