use agenda_core::domain::{Event, SelectionType, TimeSlot};
use agenda_core::types::{DbId, LocalDateTime};
use async_trait::async_trait;

use super::upsert;
use crate::error::RepoError;
use crate::repositories::{Repository, TimeSlotRepository};

#[derive(Debug, Clone, Default)]
pub struct RepositoryTimeSlotInMem {
    slots: Vec<TimeSlot>,
    last_id: DbId,
}

impl RepositoryTimeSlotInMem {
    fn create(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
        selection_type: SelectionType,
    ) -> TimeSlot {
        self.last_id += 1;
        let slot = TimeSlot {
            id: self.last_id,
            start_time,
            duration_in_minutes,
            event: event.clone(),
            kind: TimeSlot::free_kind(selection_type),
        };
        self.slots.push(slot.clone());
        slot
    }
}

#[async_trait]
impl Repository<TimeSlot> for RepositoryTimeSlotInMem {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<TimeSlot>, RepoError> {
        Ok(self.slots.iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<TimeSlot>, RepoError> {
        Ok(self.slots.clone())
    }

    async fn save(&mut self, entity: &TimeSlot) -> Result<(), RepoError> {
        upsert(&mut self.slots, entity, |s| s.id);
        self.last_id = self.last_id.max(entity.id);
        Ok(())
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        self.slots.retain(|s| s.id != id);
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        self.slots.clear();
        Ok(())
    }
}

#[async_trait]
impl TimeSlotRepository for RepositoryTimeSlotInMem {
    async fn create_time_slot_single(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError> {
        Ok(self.create(start_time, duration_in_minutes, event, SelectionType::Single))
    }

    async fn create_time_slot_multiple(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError> {
        Ok(self.create(start_time, duration_in_minutes, event, SelectionType::Multiple))
    }

    // The in-memory transaction already holds the store lock.
    async fn find_by_id_for_update(&mut self, id: DbId) -> Result<Option<TimeSlot>, RepoError> {
        Ok(self.slots.iter().find(|s| s.id == id).cloned())
    }

    async fn find_all_by_event(&mut self, event_id: DbId) -> Result<Vec<TimeSlot>, RepoError> {
        Ok(self
            .slots
            .iter()
            .filter(|s| s.event.id == event_id)
            .cloned()
            .collect())
    }
}
