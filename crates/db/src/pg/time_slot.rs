use agenda_core::domain::{Event, SelectionType, TimeSlot};
use agenda_core::types::{DbId, LocalDateTime};
use async_trait::async_trait;

use super::models::{kind_label, TimeSlotRow, SLOT_SELECT};
use super::PgTransaction;
use crate::error::RepoError;
use crate::repositories::{Repository, TimeSlotRepository};

impl PgTransaction {
    async fn insert_time_slot(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
        selection_type: SelectionType,
    ) -> Result<TimeSlot, RepoError> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO time_slots (start_time, duration_in_minutes, event_id, kind)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(start_time)
        .bind(duration_in_minutes)
        .bind(event.id)
        .bind(selection_type.as_str())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(TimeSlot {
            id,
            start_time,
            duration_in_minutes,
            event: event.clone(),
            kind: TimeSlot::free_kind(selection_type),
        })
    }
}

#[async_trait]
impl Repository<TimeSlot> for PgTransaction {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<TimeSlot>, RepoError> {
        let query = format!("{SLOT_SELECT} WHERE s.id = $1");
        let row = sqlx::query_as::<_, TimeSlotRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(TimeSlot::try_from).transpose()
    }

    async fn find_all(&mut self) -> Result<Vec<TimeSlot>, RepoError> {
        let query = format!("{SLOT_SELECT} ORDER BY s.id");
        let rows = sqlx::query_as::<_, TimeSlotRow>(&query)
            .fetch_all(&mut *self.conn)
            .await?;
        rows.into_iter().map(TimeSlot::try_from).collect()
    }

    async fn save(&mut self, entity: &TimeSlot) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO time_slots (id, start_time, duration_in_minutes, event_id, kind, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                start_time = EXCLUDED.start_time,
                duration_in_minutes = EXCLUDED.duration_in_minutes,
                event_id = EXCLUDED.event_id,
                kind = EXCLUDED.kind,
                owner_id = EXCLUDED.owner_id",
        )
        .bind(entity.id)
        .bind(entity.start_time)
        .bind(entity.duration_in_minutes)
        .bind(entity.event.id)
        .bind(kind_label(&entity.kind))
        .bind(entity.owner().map(|owner| owner.id))
        .execute(&mut *self.conn)
        .await?;
        self.sync_id_sequence("time_slots").await
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM time_slots")
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TimeSlotRepository for PgTransaction {
    async fn create_time_slot_single(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError> {
        self.insert_time_slot(start_time, duration_in_minutes, event, SelectionType::Single)
            .await
    }

    async fn create_time_slot_multiple(
        &mut self,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
        event: &Event,
    ) -> Result<TimeSlot, RepoError> {
        self.insert_time_slot(start_time, duration_in_minutes, event, SelectionType::Multiple)
            .await
    }

    async fn find_by_id_for_update(&mut self, id: DbId) -> Result<Option<TimeSlot>, RepoError> {
        let query = format!("{SLOT_SELECT} WHERE s.id = $1 FOR UPDATE OF s");
        let row = sqlx::query_as::<_, TimeSlotRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(TimeSlot::try_from).transpose()
    }

    async fn find_all_by_event(&mut self, event_id: DbId) -> Result<Vec<TimeSlot>, RepoError> {
        let query = format!("{SLOT_SELECT} WHERE s.event_id = $1 ORDER BY s.id");
        let rows = sqlx::query_as::<_, TimeSlotRow>(&query)
            .bind(event_id)
            .fetch_all(&mut *self.conn)
            .await?;
        rows.into_iter().map(TimeSlot::try_from).collect()
    }
}
