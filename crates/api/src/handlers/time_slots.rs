//! Handlers for time slots and their participants.

use agenda_core::domain::{Participant, TimeSlot};
use agenda_core::types::{DbId, LocalDateTime};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/events/{id}/timeslots`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotInput {
    /// Local start time, e.g. `2024-10-10T17:00:00`.
    pub start_time: LocalDateTime,
    pub duration_in_minutes: i32,
}

/// GET /api/events/{id}/timeslots
///
/// Empty for an unknown event.
pub async fn list_time_slots(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    Ok(Json(state.events.get_event_time_slots(event_id).await?))
}

/// POST /api/events/{id}/timeslots
///
/// Organizer only. Responds 201 with the new slot.
pub async fn create_time_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<DbId>,
    payload: Result<Json<TimeSlotInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TimeSlot>)> {
    let Json(input) = payload?;
    if input.duration_in_minutes <= 0 {
        return Err(AppError::InvalidRequestContent(
            "durationInMinutes must be positive".into(),
        ));
    }

    let slot = state
        .events
        .create_free_time_slot(
            event_id,
            auth.user.id,
            input.start_time,
            input.duration_in_minutes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// GET /api/events/{id}/timeslots/{slot}/participants
pub async fn list_participants(
    State(state): State<AppState>,
    Path((_event_id, slot_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<Participant>>> {
    Ok(Json(state.events.get_participants_in_time_slot(slot_id).await?))
}

/// PUT /api/events/{id}/timeslots/{slot}/participants
///
/// Join the slot as the caller.
pub async fn join_time_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_event_id, slot_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TimeSlot>> {
    let slot = state
        .events
        .add_participant_to_time_slot(slot_id, auth.user.id)
        .await?;
    Ok(Json(slot))
}

/// DELETE /api/events/{id}/timeslots/{slot}/participants
///
/// Leave the slot as the caller.
pub async fn leave_time_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_event_id, slot_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<TimeSlot>> {
    let slot = state
        .events
        .remove_participant_from_time_slot(slot_id, auth.user.id)
        .await?;
    Ok(Json(slot))
}
