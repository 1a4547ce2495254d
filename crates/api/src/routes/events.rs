//! Route definitions for the `/events` resource and its time slots.

use axum::routing::get;
use axum::Router;

use crate::handlers::{events, time_slots};
use crate::sse;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                                   -> list_events
/// POST   /                                   -> create_event (requires auth)
/// GET    /{id}                               -> get_event
/// GET    /{id}/details                       -> get_event_details
/// GET    /{id}/listen                        -> listen (SSE)
/// GET    /{id}/timeslots                     -> list_time_slots
/// POST   /{id}/timeslots                     -> create_time_slot (requires auth)
/// GET    /{id}/timeslots/{slot}/participants -> list_participants
/// PUT    /{id}/timeslots/{slot}/participants -> join_time_slot (requires auth)
/// DELETE /{id}/timeslots/{slot}/participants -> leave_time_slot (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/{id}", get(events::get_event))
        .route("/{id}/details", get(events::get_event_details))
        .route("/{id}/listen", get(sse::listen))
        .route(
            "/{id}/timeslots",
            get(time_slots::list_time_slots).post(time_slots::create_time_slot),
        )
        .route(
            "/{id}/timeslots/{slot}/participants",
            get(time_slots::list_participants)
                .put(time_slots::join_time_slot)
                .delete(time_slots::leave_time_slot),
        )
}
