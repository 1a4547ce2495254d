use agenda_core::domain::{Event, TimeSlot};
use agenda_core::types::{DbId, LocalDateTime};
use async_trait::async_trait;

use crate::error::RepoError;
use crate::repositories::Repository;

#[async_trait]
pub trait TimeSlotRepository: Repository<TimeSlot> {
    /// Create a free slot holding a single occupant.
    async fn create_time_slot_single(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError>;

    /// Create a slot whose occupancy is tracked by participant records.
    async fn create_time_slot_multiple(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError>;

    /// Like `find_by_id`, but the slot stays locked against other writers
    /// until the transaction ends.
    async fn find_by_id_for_update(&mut self, id: DbId) -> Result<Option<TimeSlot>, RepoError>;

    async fn find_all_by_event(&mut self, event_id: DbId) -> Result<Vec<TimeSlot>, RepoError>;
}
