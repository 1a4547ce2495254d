//! Closed sets of domain failures.
//!
//! Services return these as values; callers branch on the variant. None of
//! them describe infrastructure faults, which travel separately.

/// Failures of user registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("Email address is already in use")]
    AlreadyUsedEmailAddress,

    #[error("Password does not meet the minimum policy")]
    InsecurePassword,
}

/// Failures of token creation (login).
///
/// Blank input, unknown email and wrong password all collapse into the same
/// variant so a caller cannot tell which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenCreationError {
    #[error("User or password are invalid")]
    UserOrPasswordAreInvalid,
}

/// Failures of event and time-slot workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("Event not found")]
    EventNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Time slot not found")]
    TimeSlotNotFound,

    #[error("Time slot is already allocated to a participant")]
    SingleTimeSlotAlreadyAllocated,

    #[error("User is already a participant in the time slot")]
    UserIsAlreadyParticipantInTimeSlot,

    #[error("User is not the organizer of the event")]
    UserIsNotOrganizer,

    #[error("User is not a participant in the time slot")]
    UserIsNotParticipantInTimeSlot,
}

/// Failures of participant listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeSlotError {
    #[error("Time slot not found")]
    TimeSlotNotFound,

    #[error("Single time slots do not have multiple participants")]
    TimeSlotSingleHasNotMultipleParticipants,
}

/// Invariant violations of a single time slot's owner field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotOwnershipError {
    #[error("This time slot is already allocated to a participant")]
    AlreadyAllocated,

    #[error("User is not the owner of this time slot")]
    NotOwner,

    #[error("Time slot does not have a single owner")]
    NotSingle,
}

impl From<SlotOwnershipError> for EventError {
    fn from(err: SlotOwnershipError) -> Self {
        match err {
            SlotOwnershipError::AlreadyAllocated => EventError::SingleTimeSlotAlreadyAllocated,
            SlotOwnershipError::NotOwner | SlotOwnershipError::NotSingle => {
                EventError::UserIsNotParticipantInTimeSlot
            }
        }
    }
}
