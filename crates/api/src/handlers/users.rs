//! Handlers for registration, login, logout and the current user.

use agenda_core::types::{DbId, Timestamp};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/users`.
#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/users/token`.
#[derive(Debug, Deserialize)]
pub struct TokenInput {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct TokenOutput {
    pub token: String,
    pub expiration: Timestamp,
}

/// Response body for `GET /api/me`.
#[derive(Debug, Serialize)]
pub struct UserHomeOutput {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Register a user. Responds 201 with a `Location` header.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let user = state
        .auth
        .create_user(&input.name, &input.email, &input.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/users/{}", user.id))],
    ))
}

/// POST /api/users/token
///
/// Exchange email and password for a bearer token.
pub async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenInput>, JsonRejection>,
) -> AppResult<Json<TokenOutput>> {
    let Json(input) = payload?;
    let info = state
        .auth
        .create_token(&input.email, &input.password)
        .await?;

    Ok(Json(TokenOutput {
        token: info.token_value,
        expiration: info.token_expiration,
    }))
}

/// POST /api/logout
///
/// Revoke the token used to authenticate this request.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.auth.revoke_token(&auth.token).await?;
    tracing::info!(user_id = auth.user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me
pub async fn me(auth: AuthUser) -> Json<UserHomeOutput> {
    let user = auth.user;
    Json(UserHomeOutput {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}
