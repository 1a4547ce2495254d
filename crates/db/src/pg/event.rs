use agenda_core::domain::{Event, SelectionType, User};
use agenda_core::types::DbId;
use async_trait::async_trait;

use super::models::{EventRow, EVENT_SELECT};
use super::PgTransaction;
use crate::error::RepoError;
use crate::repositories::{EventRepository, Repository};

#[async_trait]
impl Repository<Event> for PgTransaction {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<Event>, RepoError> {
        let query = format!("{EVENT_SELECT} WHERE e.id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(Event::try_from).transpose()
    }

    async fn find_all(&mut self) -> Result<Vec<Event>, RepoError> {
        let query = format!("{EVENT_SELECT} ORDER BY e.id");
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .fetch_all(&mut *self.conn)
            .await?;
        rows.into_iter().map(Event::try_from).collect()
    }

    async fn save(&mut self, entity: &Event) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO events (id, title, description, organizer_id, selection_type)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                organizer_id = EXCLUDED.organizer_id,
                selection_type = EXCLUDED.selection_type",
        )
        .bind(entity.id)
        .bind(&entity.title)
        .bind(&entity.description)
        .bind(entity.organizer.id)
        .bind(entity.selection_type.as_str())
        .execute(&mut *self.conn)
        .await?;
        self.sync_id_sequence("events").await
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM events")
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for PgTransaction {
    async fn create_event(
        &mut self,
        title: &str,
        description: Option<&str>,
        organizer: &User,
        selection_type: SelectionType,
    ) -> Result<Event, RepoError> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO events (title, description, organizer_id, selection_type)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(title)
        .bind(description)
        .bind(organizer.id)
        .bind(selection_type.as_str())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Event {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            organizer: organizer.clone(),
            selection_type,
        })
    }
}
