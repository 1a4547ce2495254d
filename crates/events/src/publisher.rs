//! Per-event listener registry with fan-out delivery and keep-alive.
//!
//! Two locks guard the publisher. The registry lock protects the listener
//! map and the id counters and is only held for short, non-blocking updates.
//! The delivery lock serializes whole publish and keep-alive rounds so that
//! listeners observe messages in publish order. Listeners are emitted to from
//! a snapshot taken under the registry lock, which lets a listener
//! deregister itself from inside `emit` without deadlocking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use agenda_core::clock::Clock;
use agenda_core::domain::{Event, Participant, TimeSlot, User};
use agenda_core::types::DbId;
use agenda_db::repositories::Repository;
use agenda_db::{RepoError, TransactionManager};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::listener::SlotListener;
use crate::signal::{ActionKind, SlotSignal, TimeSlotData};

/// Heartbeat period used when none is configured.
pub const DEFAULT_KEEP_ALIVE_PERIOD: Duration = Duration::from_secs(2);

/// Handle identifying one listener registration.
pub type ListenerId = u64;

#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    #[error("Event not found")]
    EventNotFound,

    #[error(transparent)]
    Repository(#[from] RepoError),
}

type Registered = (ListenerId, Arc<dyn SlotListener>);

#[derive(Default)]
struct Registry {
    listeners: HashMap<DbId, Vec<Registered>>,
    last_listener_id: ListenerId,
    last_message_id: u64,
}

struct Inner {
    registry: Mutex<Registry>,
    delivery: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl Inner {
    fn registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, event_id: DbId, listener_id: ListenerId) -> bool {
        let mut registry = self.registry();
        let Some(listeners) = registry.listeners.get_mut(&event_id) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != listener_id);
        let removed = listeners.len() < before;
        if listeners.is_empty() {
            registry.listeners.remove(&event_id);
        }
        if removed {
            tracing::info!(event_id, listener_id, "Listener removed");
        }
        removed
    }

    fn publish(&self, data: TimeSlotData) {
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let event_id = data.event_id;
        let (signal, targets) = {
            let mut registry = self.registry();
            registry.last_message_id += 1;
            let signal = SlotSignal::Message {
                id: registry.last_message_id,
                data,
            };
            let targets = registry
                .listeners
                .get(&event_id)
                .cloned()
                .unwrap_or_default();
            (signal, targets)
        };
        deliver(&signal, &targets);
    }

    fn keep_alive(&self) {
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let targets: Vec<Registered> = self
            .registry()
            .listeners
            .values()
            .flatten()
            .cloned()
            .collect();
        let signal = SlotSignal::KeepAlive {
            timestamp: self.clock.now(),
        };
        deliver(&signal, &targets);
    }
}

/// Emit to every target, logging and skipping individual failures.
fn deliver(signal: &SlotSignal, targets: &[Registered]) {
    for (listener_id, listener) in targets {
        if let Err(e) = listener.emit(signal) {
            tracing::warn!(listener_id, error = %e, "Failed to deliver signal to listener");
        }
    }
}

struct KeepAliveTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Fans slot-occupancy changes out to the listeners of each event.
///
/// Constructed once per running server and shared by reference. The
/// heartbeat task started by [`SlotPublisher::start`] runs until
/// [`SlotPublisher::shutdown`] or until the publisher is dropped.
pub struct SlotPublisher {
    inner: Arc<Inner>,
    trx: Arc<dyn TransactionManager>,
    keep_alive: Mutex<Option<KeepAliveTask>>,
}

impl SlotPublisher {
    /// Create a publisher without a heartbeat task.
    pub fn new(trx: Arc<dyn TransactionManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::default()),
                delivery: Mutex::new(()),
                clock,
            }),
            trx,
            keep_alive: Mutex::new(None),
        }
    }

    /// Create a publisher and spawn its heartbeat on the current runtime.
    ///
    /// A zero period falls back to [`DEFAULT_KEEP_ALIVE_PERIOD`].
    pub fn start(
        trx: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
        keep_alive_period: Duration,
    ) -> Self {
        let keep_alive_period = if keep_alive_period.is_zero() {
            tracing::warn!(
                fallback_ms = DEFAULT_KEEP_ALIVE_PERIOD.as_millis() as u64,
                "Zero keep-alive period, using the default"
            );
            DEFAULT_KEEP_ALIVE_PERIOD
        } else {
            keep_alive_period
        };
        let publisher = Self::new(trx, clock);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keep_alive(
            Arc::downgrade(&publisher.inner),
            keep_alive_period,
            cancel.clone(),
        ));
        *publisher.keep_alive_task() = Some(KeepAliveTask { cancel, handle });
        tracing::info!(period_ms = keep_alive_period.as_millis() as u64, "Slot publisher started");
        publisher
    }

    fn keep_alive_task(&self) -> std::sync::MutexGuard<'_, Option<KeepAliveTask>> {
        self.keep_alive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `listener` for the event with `event_id`.
    ///
    /// The listener deregisters itself when it completes or fails.
    pub async fn add_listener(
        &self,
        event_id: DbId,
        listener: Arc<dyn SlotListener>,
    ) -> Result<ListenerId, PublisherError> {
        let mut tx = self.trx.begin().await?;
        let event = tx.events().find_by_id(event_id).await?;
        tx.commit().await?;
        let Some(event) = event else {
            return Err(PublisherError::EventNotFound);
        };

        let listener_id = {
            let mut registry = self.inner.registry();
            registry.last_listener_id += 1;
            let listener_id = registry.last_listener_id;
            registry
                .listeners
                .entry(event.id)
                .or_default()
                .push((listener_id, Arc::clone(&listener)));
            listener_id
        };
        tracing::info!(event_id = event.id, listener_id, "Listener added");

        let weak = Arc::downgrade(&self.inner);
        listener.on_completion(Box::new({
            let weak = Weak::clone(&weak);
            move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(event_id, listener_id);
                }
            }
        }));
        listener.on_error(Box::new(move |e| {
            tracing::debug!(event_id, listener_id, error = %e, "Listener failed");
            if let Some(inner) = weak.upgrade() {
                inner.remove(event_id, listener_id);
            }
        }));

        Ok(listener_id)
    }

    /// Deregister one listener. Returns whether it was registered.
    pub fn remove_listener(&self, event_id: DbId, listener_id: ListenerId) -> bool {
        self.inner.remove(event_id, listener_id)
    }

    /// Number of listeners currently registered for an event.
    pub fn listener_count(&self, event_id: DbId) -> usize {
        self.inner
            .registry()
            .listeners
            .get(&event_id)
            .map_or(0, Vec::len)
    }

    /// Deliver a slot-updated message to every listener of `event`.
    pub fn publish(
        &self,
        event: &Event,
        slot: &TimeSlot,
        user: &User,
        action: ActionKind,
        participant: Option<&Participant>,
    ) {
        tracing::debug!(event_id = event.id, slot_id = slot.id, ?action, "Publishing slot update");
        self.inner
            .publish(TimeSlotData::new(event, slot, user, action, participant));
    }

    /// Send one heartbeat to every registered listener.
    pub fn keep_alive(&self) {
        self.inner.keep_alive();
    }

    /// Stop the heartbeat task and wait for it to finish.
    pub async fn shutdown(&self) {
        let task = self.keep_alive_task().take();
        if let Some(task) = task {
            task.cancel.cancel();
            if let Err(e) = task.handle.await {
                tracing::error!(error = %e, "Keep-alive task ended abnormally");
            }
            tracing::info!("Slot publisher stopped");
        }
    }
}

impl Drop for SlotPublisher {
    fn drop(&mut self) {
        if let Some(task) = self.keep_alive_task().take() {
            task.cancel.cancel();
        }
    }
}

async fn run_keep_alive(inner: Weak<Inner>, period: Duration, cancel: CancellationToken) {
    let start = tokio::time::Instant::now() + period;
    let mut interval = tokio::time::interval_at(start, period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Keep-alive loop cancelled");
                break;
            }
            _ = interval.tick() => {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                inner.keep_alive();
            }
        }
    }
}
