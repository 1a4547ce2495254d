//! Handlers for the `/api/events` resource.

use agenda_core::domain::{Event, SelectionType};
use agenda_core::types::DbId;
use agenda_service::EventDetails;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/events`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub selection_type: SelectionType,
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(state.events.get_all_events().await?))
}

/// POST /api/events
///
/// Create an event organized by the caller. Responds 201 with the new id.
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidRequestContent("title must not be blank".into()));
    }

    let event = state
        .events
        .create_event(
            title,
            input.description.as_deref(),
            auth.user.id,
            input.selection_type,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/events/{}", event.id))],
        Json(event.id),
    ))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.events.get_event_by_id(event_id).await?))
}

/// GET /api/events/{id}/details
///
/// The event, its slots and, for `MULTIPLE` events, each slot's participants.
pub async fn get_event_details(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<EventDetails>> {
    Ok(Json(state.events.get_event_details(event_id).await?))
}
