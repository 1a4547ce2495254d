//! Application services of the agenda.
//!
//! Every operation opens one transaction through the injected
//! [`TransactionManager`](agenda_db::TransactionManager), performs its
//! checks and writes inside it, and commits only on success.

pub mod auth;
pub mod error;
pub mod event;

pub use auth::UserAuthService;
pub use error::ServiceError;
pub use event::{EventDetails, EventService};
