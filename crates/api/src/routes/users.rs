//! Route definitions for users and sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes merged at the `/api` root.
///
/// ```text
/// POST /users        -> register
/// POST /users/token  -> create_token
/// POST /logout       -> logout (requires auth)
/// GET  /me           -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/users/token", post(users::create_token))
        .route("/logout", post(users::logout))
        .route("/me", get(users::me))
}
