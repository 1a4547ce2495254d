//! Domain entities.
//!
//! Entities are plain values: repositories hand out copies and services pass
//! them by value. No entity graph is shared or mutated in place.

pub mod event;
pub mod participant;
pub mod time_slot;
pub mod user;

pub use event::{Event, SelectionType};
pub use participant::Participant;
pub use time_slot::{TimeSlot, TimeSlotKind};
pub use user::{PasswordValidationInfo, Token, TokenExternalInfo, TokenValidationInfo, User};
