use agenda_core::domain::{Participant, TimeSlot, User};
use agenda_core::types::DbId;
use async_trait::async_trait;

use super::upsert;
use crate::error::RepoError;
use crate::repositories::{ParticipantRepository, Repository};

#[derive(Debug, Clone, Default)]
pub struct RepositoryParticipantInMem {
    participants: Vec<Participant>,
    last_id: DbId,
}

#[async_trait]
impl Repository<Participant> for RepositoryParticipantInMem {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<Participant>, RepoError> {
        Ok(self.participants.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<Participant>, RepoError> {
        Ok(self.participants.clone())
    }

    async fn save(&mut self, entity: &Participant) -> Result<(), RepoError> {
        upsert(&mut self.participants, entity, |p| p.id);
        self.last_id = self.last_id.max(entity.id);
        Ok(())
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        self.participants.retain(|p| p.id != id);
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        self.participants.clear();
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for RepositoryParticipantInMem {
    async fn create_participant(
        &mut self,
        user: &User,
        slot: &TimeSlot,
    ) -> Result<Participant, RepoError> {
        self.last_id += 1;
        let participant = Participant {
            id: self.last_id,
            user: user.clone(),
            slot: slot.clone(),
        };
        self.participants.push(participant.clone());
        Ok(participant)
    }

    async fn find_by_email(
        &mut self,
        email: &str,
        slot_id: DbId,
    ) -> Result<Option<Participant>, RepoError> {
        Ok(self
            .participants
            .iter()
            .find(|p| p.user.email == email && p.slot.id == slot_id)
            .cloned())
    }

    async fn find_all_by_time_slot(
        &mut self,
        slot_id: DbId,
    ) -> Result<Vec<Participant>, RepoError> {
        Ok(self
            .participants
            .iter()
            .filter(|p| p.slot.id == slot_id)
            .cloned()
            .collect())
    }
}
