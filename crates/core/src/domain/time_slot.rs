use serde::Serialize;

use crate::domain::event::{Event, SelectionType};
use crate::domain::user::User;
use crate::error::SlotOwnershipError;
use crate::types::{DbId, LocalDateTime};

/// Variant-specific part of a [`TimeSlot`].
///
/// Fixed at creation from the parent event's [`SelectionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TimeSlotKind {
    /// At most one occupant, stored on the slot itself.
    Single { owner: Option<User> },
    /// Occupancy lives in separate participant records.
    Multiple,
}

/// A bookable period of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: DbId,
    pub start_time: LocalDateTime,
    pub duration_in_minutes: i32,
    pub event: Event,
    #[serde(flatten)]
    pub kind: TimeSlotKind,
}

impl TimeSlot {
    /// The variant matching a selection type, with no occupant.
    pub fn free_kind(selection_type: SelectionType) -> TimeSlotKind {
        match selection_type {
            SelectionType::Single => TimeSlotKind::Single { owner: None },
            SelectionType::Multiple => TimeSlotKind::Multiple,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self.kind, TimeSlotKind::Single { .. })
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self.kind, TimeSlotKind::Multiple)
    }

    /// Current owner of a single slot. Always `None` for multiple slots.
    pub fn owner(&self) -> Option<&User> {
        match &self.kind {
            TimeSlotKind::Single { owner } => owner.as_ref(),
            TimeSlotKind::Multiple => None,
        }
    }

    /// Assign `user` as the owner of an empty single slot.
    pub fn add_owner(self, user: User) -> Result<TimeSlot, SlotOwnershipError> {
        match self.kind {
            TimeSlotKind::Single { owner: Some(_) } => Err(SlotOwnershipError::AlreadyAllocated),
            TimeSlotKind::Single { owner: None } => Ok(TimeSlot {
                kind: TimeSlotKind::Single { owner: Some(user) },
                ..self
            }),
            TimeSlotKind::Multiple => Err(SlotOwnershipError::NotSingle),
        }
    }

    /// Clear the owner of a single slot, provided `user` is that owner.
    pub fn remove_owner(self, user: &User) -> Result<TimeSlot, SlotOwnershipError> {
        let is_owner = self.owner().is_some_and(|current| current.id == user.id);
        match self.kind {
            TimeSlotKind::Single { .. } if is_owner => Ok(TimeSlot {
                kind: TimeSlotKind::Single { owner: None },
                ..self
            }),
            TimeSlotKind::Single { .. } => Err(SlotOwnershipError::NotOwner),
            TimeSlotKind::Multiple => Err(SlotOwnershipError::NotSingle),
        }
    }
}
