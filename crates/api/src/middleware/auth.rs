//! Bearer token authentication extractor for Axum handlers.

use agenda_core::domain::User;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `Authorization: Bearer <token>` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// Resolving the token also refreshes its rolling expiration.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// The raw token presented by the client.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = parse_bearer(header).ok_or(AppError::Unauthorized)?;

        let user = state
            .auth
            .get_user_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Extract the token of a `Bearer` credential. The scheme is case-insensitive.
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
