pub mod events;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /users                                       register (POST)
/// /users/token                                 login (POST)
/// /logout                                      revoke current token (requires auth)
/// /me                                          current user (requires auth)
///
/// /events                                      list, create (create requires auth)
/// /events/{id}                                 get
/// /events/{id}/details                         event with slots and participants
/// /events/{id}/listen                          server-sent slot updates
/// /events/{id}/timeslots                       list, create (create requires auth)
/// /events/{id}/timeslots/{slot}/participants   list, join (PUT), leave (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .nest("/events", events::router())
}
