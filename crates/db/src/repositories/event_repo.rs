use agenda_core::domain::{Event, SelectionType, User};
use async_trait::async_trait;

use crate::error::RepoError;
use crate::repositories::Repository;

#[async_trait]
pub trait EventRepository: Repository<Event> {
    async fn create_event(
        &mut self,
        title: &str,
        description: Option<&str>,
        organizer: &User,
        selection_type: SelectionType,
    ) -> Result<Event, RepoError>;
}
