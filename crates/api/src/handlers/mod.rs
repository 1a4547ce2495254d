pub mod events;
pub mod time_slots;
pub mod users;
