use agenda_core::domain::{Participant, TimeSlot, User};
use agenda_core::types::DbId;
use async_trait::async_trait;

use crate::error::RepoError;
use crate::repositories::Repository;

/// Occupancy records of multiple-type time slots.
#[async_trait]
pub trait ParticipantRepository: Repository<Participant> {
    async fn create_participant(
        &mut self,
        user: &User,
        slot: &TimeSlot,
    ) -> Result<Participant, RepoError>;

    /// The participant of `slot_id` whose user has `email`, if any.
    async fn find_by_email(
        &mut self,
        email: &str,
        slot_id: DbId,
    ) -> Result<Option<Participant>, RepoError>;

    /// All participants of a slot, in creation order.
    async fn find_all_by_time_slot(&mut self, slot_id: DbId)
        -> Result<Vec<Participant>, RepoError>;
}
