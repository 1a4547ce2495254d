//! Slot-occupancy notifications.
//!
//! - [`SlotPublisher`] -- per-event listener registry with fan-out publish
//!   and a periodic keep-alive heartbeat.
//! - [`SlotListener`] -- what a transport implements to receive signals.
//! - [`ChannelListener`] -- a listener that forwards signals into an
//!   unbounded tokio channel, for transports that stream from a receiver.
//! - [`SlotSignal`] -- the messages delivered to listeners.

pub mod listener;
pub mod publisher;
pub mod signal;

pub use listener::{ChannelListener, CompletionCallback, EmitError, ErrorCallback, SlotListener};
pub use publisher::{ListenerId, PublisherError, SlotPublisher, DEFAULT_KEEP_ALIVE_PERIOD};
pub use signal::{ActionKind, SlotSignal, TimeSlotData};
