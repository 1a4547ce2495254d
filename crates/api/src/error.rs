use agenda_core::error::{EventError, TimeSlotError, TokenCreationError, UserError};
use agenda_db::RepoError;
use agenda_events::PublisherError;
use agenda_service::ServiceError;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Media type of every error body.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Application-level error type for HTTP handlers.
///
/// Each domain failure maps to a fixed status and problem identifier; the
/// body is `{"type": "/problems/<id>", "title": "<id>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    TokenCreation(#[from] TokenCreationError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    TimeSlot(#[from] TimeSlotError),

    /// Missing, malformed, unknown or expired bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// A body that could not be decoded or failed validation.
    #[error("Invalid request content: {0}")]
    InvalidRequestContent(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl<E> From<ServiceError<E>> for AppError
where
    E: std::error::Error + Into<AppError> + 'static,
{
    fn from(err: ServiceError<E>) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Repository(e) => AppError::Repository(e),
            ServiceError::PasswordHashing(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<PublisherError> for AppError {
    fn from(err: PublisherError) -> Self {
        match err {
            PublisherError::EventNotFound => AppError::Event(EventError::EventNotFound),
            PublisherError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequestContent(rejection.body_text())
    }
}

impl AppError {
    /// Status code and problem identifier for this error.
    pub fn problem(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::User(e) => match e {
                UserError::AlreadyUsedEmailAddress => {
                    (StatusCode::CONFLICT, "email-already-in-use")
                }
                UserError::InsecurePassword => (StatusCode::BAD_REQUEST, "insecure-password"),
            },
            AppError::TokenCreation(TokenCreationError::UserOrPasswordAreInvalid) => {
                (StatusCode::UNAUTHORIZED, "user-or-password-are-invalid")
            }
            AppError::Event(e) => match e {
                EventError::EventNotFound => (StatusCode::NOT_FOUND, "event-not-found"),
                EventError::UserNotFound => (StatusCode::NOT_FOUND, "user-not-found"),
                EventError::TimeSlotNotFound => (StatusCode::NOT_FOUND, "timeslot-not-found"),
                EventError::SingleTimeSlotAlreadyAllocated => {
                    (StatusCode::CONFLICT, "timeslot-already-allocated")
                }
                EventError::UserIsAlreadyParticipantInTimeSlot => (
                    StatusCode::CONFLICT,
                    "user-is-already-participant-in-time-slot",
                ),
                EventError::UserIsNotOrganizer => (StatusCode::FORBIDDEN, "user-is-not-organizer"),
                EventError::UserIsNotParticipantInTimeSlot => (
                    StatusCode::BAD_REQUEST,
                    "user-is-not-participant-in-time-slot",
                ),
            },
            AppError::TimeSlot(e) => match e {
                TimeSlotError::TimeSlotNotFound => (StatusCode::NOT_FOUND, "timeslot-not-found"),
                TimeSlotError::TimeSlotSingleHasNotMultipleParticipants => (
                    StatusCode::BAD_REQUEST,
                    "timeslot-single-has-not-multiple-participants",
                ),
            },
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::InvalidRequestContent(_) => {
                (StatusCode::BAD_REQUEST, "invalid-request-content")
            }
            AppError::Repository(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal-server-error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Repository(err) => tracing::error!(error = %err, "Repository error"),
            AppError::InternalError(msg) => tracing::error!(error = %msg, "Internal error"),
            AppError::InvalidRequestContent(msg) => {
                tracing::debug!(reason = %msg, "Rejected request content")
            }
            _ => {}
        }

        let (status, id) = self.problem();
        let body = json!({
            "type": format!("/problems/{id}"),
            "title": id,
        });

        let mut response = (status, axum::Json(body)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("bearer"));
        }
        response
    }
}
