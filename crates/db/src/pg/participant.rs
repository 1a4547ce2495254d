use agenda_core::domain::{Participant, TimeSlot, User};
use agenda_core::types::DbId;
use async_trait::async_trait;

use super::models::{ParticipantRow, PARTICIPANT_SELECT};
use super::PgTransaction;
use crate::error::RepoError;
use crate::repositories::{ParticipantRepository, Repository};

impl PgTransaction {
    /// Attach the owning slot to each row, loading every distinct slot once.
    async fn hydrate_participants(
        &mut self,
        rows: Vec<ParticipantRow>,
    ) -> Result<Vec<Participant>, RepoError> {
        let mut slots: Vec<TimeSlot> = Vec::new();
        let mut participants = Vec::with_capacity(rows.len());
        for row in rows {
            let slot = match slots.iter().find(|s| s.id == row.slot_id) {
                Some(slot) => slot.clone(),
                None => {
                    let slot = <Self as Repository<TimeSlot>>::find_by_id(&mut *self, row.slot_id)
                        .await?
                        .ok_or_else(|| {
                            RepoError::Decode(format!(
                                "participant {} references missing time slot {}",
                                row.id, row.slot_id
                            ))
                        })?;
                    slots.push(slot.clone());
                    slot
                }
            };
            participants.push(Participant {
                id: row.id,
                user: row.user(),
                slot,
            });
        }
        Ok(participants)
    }
}

#[async_trait]
impl Repository<Participant> for PgTransaction {
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<Participant>, RepoError> {
        let query = format!("{PARTICIPANT_SELECT} WHERE p.id = $1");
        let rows = sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(id)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(self.hydrate_participants(rows).await?.pop())
    }

    async fn find_all(&mut self) -> Result<Vec<Participant>, RepoError> {
        let query = format!("{PARTICIPANT_SELECT} ORDER BY p.id");
        let rows = sqlx::query_as::<_, ParticipantRow>(&query)
            .fetch_all(&mut *self.conn)
            .await?;
        self.hydrate_participants(rows).await
    }

    async fn save(&mut self, entity: &Participant) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO participants (id, user_id, slot_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                slot_id = EXCLUDED.slot_id",
        )
        .bind(entity.id)
        .bind(entity.user.id)
        .bind(entity.slot.id)
        .execute(&mut *self.conn)
        .await?;
        self.sync_id_sequence("participants").await
    }

    async fn delete_by_id(&mut self, id: DbId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM participants")
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for PgTransaction {
    async fn create_participant(
        &mut self,
        user: &User,
        slot: &TimeSlot,
    ) -> Result<Participant, RepoError> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO participants (user_id, slot_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user.id)
        .bind(slot.id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Participant {
            id,
            user: user.clone(),
            slot: slot.clone(),
        })
    }

    async fn find_by_email(
        &mut self,
        email: &str,
        slot_id: DbId,
    ) -> Result<Option<Participant>, RepoError> {
        let query = format!("{PARTICIPANT_SELECT} WHERE u.email = $1 AND p.slot_id = $2");
        let rows = sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(email)
            .bind(slot_id)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(self.hydrate_participants(rows).await?.pop())
    }

    async fn find_all_by_time_slot(
        &mut self,
        slot_id: DbId,
    ) -> Result<Vec<Participant>, RepoError> {
        let query = format!("{PARTICIPANT_SELECT} WHERE p.slot_id = $1 ORDER BY p.id");
        let rows = sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(slot_id)
            .fetch_all(&mut *self.conn)
            .await?;
        self.hydrate_participants(rows).await
    }
}
