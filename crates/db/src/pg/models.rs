//! Row shapes returned by the joined queries and their mapping into domain
//! values.

use agenda_core::domain::{
    Event, PasswordValidationInfo, SelectionType, TimeSlot, TimeSlotKind, Token,
    TokenValidationInfo, User,
};
use agenda_core::types::{DbId, LocalDateTime, Timestamp};
use sqlx::FromRow;

use crate::error::RepoError;

/// Column list for plain `users` queries.
pub(crate) const USER_COLUMNS: &str = "id, name, email, password_validation";

/// Select clause producing [`EventRow`]s.
pub(crate) const EVENT_SELECT: &str = "SELECT e.id, e.title, e.description, e.selection_type, \
     u.id AS organizer_id, u.name AS organizer_name, u.email AS organizer_email, \
     u.password_validation AS organizer_password_validation \
     FROM events e JOIN users u ON u.id = e.organizer_id";

/// Select clause producing [`TimeSlotRow`]s.
pub(crate) const SLOT_SELECT: &str = "SELECT s.id, s.start_time, s.duration_in_minutes, s.kind, \
     o.id AS owner_id, o.name AS owner_name, o.email AS owner_email, \
     o.password_validation AS owner_password_validation, \
     e.id AS event_id, e.title AS event_title, e.description AS event_description, \
     e.selection_type AS event_selection_type, \
     u.id AS organizer_id, u.name AS organizer_name, u.email AS organizer_email, \
     u.password_validation AS organizer_password_validation \
     FROM time_slots s \
     JOIN events e ON e.id = s.event_id \
     JOIN users u ON u.id = e.organizer_id \
     LEFT JOIN users o ON o.id = s.owner_id";

/// Select clause producing [`ParticipantRow`]s.
pub(crate) const PARTICIPANT_SELECT: &str = "SELECT p.id, p.slot_id, \
     u.id AS user_id, u.name AS user_name, u.email AS user_email, \
     u.password_validation AS user_password_validation \
     FROM participants p JOIN users u ON u.id = p.user_id";

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_validation: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_validation: PasswordValidationInfo::new(row.password_validation),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserTokenRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_validation: String,
    pub token_validation: String,
    pub created_at: Timestamp,
    pub last_used_at: Timestamp,
}

impl From<UserTokenRow> for (User, Token) {
    fn from(row: UserTokenRow) -> Self {
        let token = Token {
            validation_info: TokenValidationInfo::new(row.token_validation),
            user_id: row.id,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        };
        let user = User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_validation: PasswordValidationInfo::new(row.password_validation),
        };
        (user, token)
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub selection_type: String,
    pub organizer_id: DbId,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_password_validation: String,
}

fn parse_selection_type(raw: &str) -> Result<SelectionType, RepoError> {
    raw.parse().map_err(RepoError::Decode)
}

impl TryFrom<EventRow> for Event {
    type Error = RepoError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            selection_type: parse_selection_type(&row.selection_type)?,
            organizer: User {
                id: row.organizer_id,
                name: row.organizer_name,
                email: row.organizer_email,
                password_validation: PasswordValidationInfo::new(
                    row.organizer_password_validation,
                ),
            },
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TimeSlotRow {
    pub id: DbId,
    pub start_time: LocalDateTime,
    pub duration_in_minutes: i32,
    pub kind: String,
    pub owner_id: Option<DbId>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_password_validation: Option<String>,
    pub event_id: DbId,
    pub event_title: String,
    pub event_description: Option<String>,
    pub event_selection_type: String,
    pub organizer_id: DbId,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_password_validation: String,
}

impl TryFrom<TimeSlotRow> for TimeSlot {
    type Error = RepoError;

    fn try_from(row: TimeSlotRow) -> Result<Self, Self::Error> {
        let owner = match (
            row.owner_id,
            row.owner_name,
            row.owner_email,
            row.owner_password_validation,
        ) {
            (Some(id), Some(name), Some(email), Some(pvi)) => Some(User {
                id,
                name,
                email,
                password_validation: PasswordValidationInfo::new(pvi),
            }),
            _ => None,
        };
        let kind = match parse_selection_type(&row.kind)? {
            SelectionType::Single => TimeSlotKind::Single { owner },
            SelectionType::Multiple => TimeSlotKind::Multiple,
        };
        let event = Event::try_from(EventRow {
            id: row.event_id,
            title: row.event_title,
            description: row.event_description,
            selection_type: row.event_selection_type,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
            organizer_email: row.organizer_email,
            organizer_password_validation: row.organizer_password_validation,
        })?;
        Ok(TimeSlot {
            id: row.id,
            start_time: row.start_time,
            duration_in_minutes: row.duration_in_minutes,
            event,
            kind,
        })
    }
}

/// Stored text of a slot's variant.
pub(crate) fn kind_label(kind: &TimeSlotKind) -> &'static str {
    match kind {
        TimeSlotKind::Single { .. } => SelectionType::Single.as_str(),
        TimeSlotKind::Multiple => SelectionType::Multiple.as_str(),
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ParticipantRow {
    pub id: DbId,
    pub slot_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_password_validation: String,
}

impl ParticipantRow {
    pub(crate) fn user(&self) -> User {
        User {
            id: self.user_id,
            name: self.user_name.clone(),
            email: self.user_email.clone(),
            password_validation: PasswordValidationInfo::new(self.user_password_validation.clone()),
        }
    }
}
