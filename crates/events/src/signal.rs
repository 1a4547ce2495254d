use agenda_core::domain::{Event, Participant, TimeSlot, User};
use agenda_core::types::{DbId, Timestamp};
use serde::Serialize;

/// What happened to a slot's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    UserJoined,
    UserLeft,
}

/// Payload of a slot-updated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotData {
    pub event_id: DbId,
    pub slot_id: DbId,
    pub action: ActionKind,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub participant_id: Option<DbId>,
}

impl TimeSlotData {
    pub fn new(
        event: &Event,
        slot: &TimeSlot,
        user: &User,
        action: ActionKind,
        participant: Option<&Participant>,
    ) -> Self {
        Self {
            event_id: event.id,
            slot_id: slot.id,
            action,
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            participant_id: participant.map(|p| p.id),
        }
    }
}

/// A signal delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SlotSignal {
    /// A slot of the listened event changed occupancy.
    Message { id: u64, data: TimeSlotData },
    /// Heartbeat keeping idle streams open.
    KeepAlive { timestamp: Timestamp },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_id_and_camel_case_data() {
        let signal = SlotSignal::Message {
            id: 7,
            data: TimeSlotData {
                event_id: 1,
                slot_id: 2,
                action: ActionKind::UserJoined,
                user_id: 3,
                user_name: "Bob".into(),
                user_email: "bob@example.com".into(),
                participant_id: None,
            },
        };

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["data"]["eventId"], 1);
        assert_eq!(json["data"]["slotId"], 2);
        assert_eq!(json["data"]["action"], "UserJoined");
        assert_eq!(json["data"]["userEmail"], "bob@example.com");
        assert!(json["data"]["participantId"].is_null());
    }
}
