use agenda_core::domain::{Event, SelectionType, User};
use agenda_core::types::DbId;
use async_trait::async_trait;

use super::upsert;
use crate::error::RepoError;
use crate::repositories::{EventRepository, Repository};

#[derive(Debug, Clone, Default)]
pub struct RepositoryEventInMem {
    events: Vec<Event>,
    last_id: DbId,
}

#[async_trait]
impl Repository<Event> for RepositoryEventInMem {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<Event>, RepoError> {
        Ok(self.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<Event>, RepoError> {
        Ok(self.events.clone())
    }

    async fn save(&mut self, entity: &Event) -> Result<(), RepoError> {
        upsert(&mut self.events, entity, |e| e.id);
        self.last_id = self.last_id.max(entity.id);
        Ok(())
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        self.events.retain(|e| e.id != id);
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        self.events.clear();
        Ok(())
    }
}

#[async_trait]
impl EventRepository for RepositoryEventInMem {
    async fn create_event(
        &mut self,
        title: &str,
        description: Option<&str>,
        organizer: &User,
        selection_type: SelectionType,
    ) -> Result<Event, RepoError> {
        self.last_id += 1;
        let event = Event {
            id: self.last_id,
            title: title.to_string(),
            description: description.map(str::to_string),
            organizer: organizer.clone(),
            selection_type,
        };
        self.events.push(event.clone());
        Ok(event)
    }
}
