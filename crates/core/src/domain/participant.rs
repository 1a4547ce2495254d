use serde::Serialize;

use crate::domain::time_slot::TimeSlot;
use crate::domain::user::User;
use crate::types::DbId;

/// One user's occupancy of one multiple-type time slot.
///
/// `slot` is always the `Multiple` variant; repositories only create
/// participants for such slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: DbId,
    pub user: User,
    pub slot: TimeSlot,
}
