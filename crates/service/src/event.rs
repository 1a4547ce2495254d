//! Events, time slots and participation.

use std::collections::HashMap;
use std::sync::Arc;

use agenda_core::domain::{Event, Participant, SelectionType, TimeSlot, TimeSlotKind};
use agenda_core::error::{EventError, TimeSlotError};
use agenda_core::types::{DbId, LocalDateTime};
use agenda_db::repositories::Repository;
use agenda_db::{RepoError, TransactionManager, PARTICIPANTS_USER_SLOT_CONSTRAINT};
use agenda_events::{ActionKind, SlotPublisher};
use serde::Serialize;

use crate::error::{failure, ServiceError};

/// An event with everything needed to render it in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event: Event,
    pub time_slots: Vec<TimeSlot>,
    /// Participants per slot id. Only filled for `MULTIPLE` events.
    pub participants_by_slot: HashMap<DbId, Vec<Participant>>,
}

pub struct EventService {
    trx: Arc<dyn TransactionManager>,
    publisher: Arc<SlotPublisher>,
}

impl EventService {
    pub fn new(trx: Arc<dyn TransactionManager>, publisher: Arc<SlotPublisher>) -> Self {
        Self { trx, publisher }
    }

    pub async fn create_event(
        &self,
        title: &str,
        description: Option<&str>,
        organizer_id: DbId,
        selection_type: SelectionType,
    ) -> Result<Event, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let Some(organizer) = tx.users().find_by_id(organizer_id).await? else {
            return failure(EventError::UserNotFound);
        };
        let event = tx
            .events()
            .create_event(title, description, &organizer, selection_type)
            .await?;
        tx.commit().await?;

        tracing::info!(event_id = event.id, organizer_id, %selection_type, "Event created");
        Ok(event)
    }

    pub async fn get_all_events(&self) -> Result<Vec<Event>, RepoError> {
        let mut tx = self.trx.begin().await?;
        let events = tx.events().find_all().await?;
        tx.commit().await?;
        Ok(events)
    }

    pub async fn get_event_by_id(&self, event_id: DbId) -> Result<Event, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let event = tx.events().find_by_id(event_id).await?;
        tx.commit().await?;
        event.map_or_else(|| failure(EventError::EventNotFound), Ok)
    }

    /// Slots of an event; empty when the event does not exist.
    pub async fn get_event_time_slots(&self, event_id: DbId) -> Result<Vec<TimeSlot>, RepoError> {
        let mut tx = self.trx.begin().await?;
        let slots = match tx.events().find_by_id(event_id).await? {
            Some(event) => tx.slots().find_all_by_event(event.id).await?,
            None => Vec::new(),
        };
        tx.commit().await?;
        Ok(slots)
    }

    /// Create an unoccupied slot. Only the event's organizer may do this.
    pub async fn create_free_time_slot(
        &self,
        event_id: DbId,
        user_id: DbId,
        start_time: LocalDateTime,
        duration_in_minutes: i32,
    ) -> Result<TimeSlot, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let Some(event) = tx.events().find_by_id(event_id).await? else {
            return failure(EventError::EventNotFound);
        };
        if event.organizer.id != user_id {
            return failure(EventError::UserIsNotOrganizer);
        }
        let slot = match event.selection_type {
            SelectionType::Single => {
                tx.slots()
                    .create_time_slot_single(start_time, duration_in_minutes, &event)
                    .await?
            }
            SelectionType::Multiple => {
                tx.slots()
                    .create_time_slot_multiple(start_time, duration_in_minutes, &event)
                    .await?
            }
        };
        tx.commit().await?;

        tracing::info!(event_id, slot_id = slot.id, "Time slot created");
        Ok(slot)
    }

    /// Occupy a slot on behalf of a user and notify the event's listeners.
    pub async fn add_participant_to_time_slot(
        &self,
        time_slot_id: DbId,
        user_id: DbId,
    ) -> Result<TimeSlot, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let Some(slot) = tx.slots().find_by_id_for_update(time_slot_id).await? else {
            return failure(EventError::TimeSlotNotFound);
        };
        let Some(user) = tx.users().find_by_id(user_id).await? else {
            return failure(EventError::UserNotFound);
        };

        match slot.kind {
            TimeSlotKind::Single { .. } => {
                let updated = match slot.add_owner(user.clone()) {
                    Ok(updated) => updated,
                    Err(e) => return failure(e.into()),
                };
                tx.slots().save(&updated).await?;
                tx.commit().await?;

                tracing::info!(slot_id = updated.id, user_id, "User joined single time slot");
                self.publisher
                    .publish(&updated.event, &updated, &user, ActionKind::UserJoined, None);
                Ok(updated)
            }
            TimeSlotKind::Multiple => {
                if tx
                    .participants()
                    .find_by_email(&user.email, slot.id)
                    .await?
                    .is_some()
                {
                    return failure(EventError::UserIsAlreadyParticipantInTimeSlot);
                }
                let participant = match tx.participants().create_participant(&user, &slot).await {
                    Ok(participant) => participant,
                    Err(e) if e.violates(PARTICIPANTS_USER_SLOT_CONSTRAINT) => {
                        return failure(EventError::UserIsAlreadyParticipantInTimeSlot)
                    }
                    Err(e) => return Err(e.into()),
                };
                tx.commit().await?;

                tracing::info!(
                    slot_id = slot.id,
                    user_id,
                    participant_id = participant.id,
                    "User joined multiple time slot"
                );
                self.publisher.publish(
                    &slot.event,
                    &slot,
                    &participant.user,
                    ActionKind::UserJoined,
                    Some(&participant),
                );
                Ok(slot)
            }
        }
    }

    /// Release a user's occupancy of a slot and notify the event's listeners.
    pub async fn remove_participant_from_time_slot(
        &self,
        time_slot_id: DbId,
        user_id: DbId,
    ) -> Result<TimeSlot, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let Some(slot) = tx.slots().find_by_id_for_update(time_slot_id).await? else {
            return failure(EventError::TimeSlotNotFound);
        };
        let Some(user) = tx.users().find_by_id(user_id).await? else {
            return failure(EventError::UserNotFound);
        };

        match slot.kind {
            TimeSlotKind::Single { .. } => {
                let updated = match slot.remove_owner(&user) {
                    Ok(updated) => updated,
                    Err(e) => return failure(e.into()),
                };
                tx.slots().save(&updated).await?;
                tx.commit().await?;

                tracing::info!(slot_id = updated.id, user_id, "User left single time slot");
                self.publisher
                    .publish(&updated.event, &updated, &user, ActionKind::UserLeft, None);
                Ok(updated)
            }
            TimeSlotKind::Multiple => {
                let Some(participant) = tx
                    .participants()
                    .find_by_email(&user.email, slot.id)
                    .await?
                else {
                    return failure(EventError::UserIsNotParticipantInTimeSlot);
                };
                tx.participants().delete_by_id(participant.id).await?;
                tx.commit().await?;

                tracing::info!(
                    slot_id = slot.id,
                    user_id,
                    participant_id = participant.id,
                    "User left multiple time slot"
                );
                self.publisher.publish(
                    &slot.event,
                    &slot,
                    &user,
                    ActionKind::UserLeft,
                    Some(&participant),
                );
                Ok(slot)
            }
        }
    }

    pub async fn get_event_details(
        &self,
        event_id: DbId,
    ) -> Result<EventDetails, ServiceError<EventError>> {
        let mut tx = self.trx.begin().await?;
        let Some(event) = tx.events().find_by_id(event_id).await? else {
            return failure(EventError::EventNotFound);
        };
        let time_slots = tx.slots().find_all_by_event(event.id).await?;

        let mut participants_by_slot = HashMap::new();
        if event.selection_type == SelectionType::Multiple {
            for slot in time_slots.iter().filter(|s| s.is_multiple()) {
                let participants = tx.participants().find_all_by_time_slot(slot.id).await?;
                participants_by_slot.insert(slot.id, participants);
            }
        }
        tx.commit().await?;

        Ok(EventDetails {
            event,
            time_slots,
            participants_by_slot,
        })
    }

    pub async fn get_participants_in_time_slot(
        &self,
        time_slot_id: DbId,
    ) -> Result<Vec<Participant>, ServiceError<TimeSlotError>> {
        let mut tx = self.trx.begin().await?;
        let Some(slot) = tx.slots().find_by_id(time_slot_id).await? else {
            return failure(TimeSlotError::TimeSlotNotFound);
        };
        if slot.is_single() {
            return failure(TimeSlotError::TimeSlotSingleHasNotMultipleParticipants);
        }
        let participants = tx.participants().find_all_by_time_slot(slot.id).await?;
        tx.commit().await?;
        Ok(participants)
    }
}
