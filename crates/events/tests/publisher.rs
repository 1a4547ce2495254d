//! Publisher behaviour against the in-memory backing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agenda_core::clock::{Clock, FixedClock, SystemClock};
use agenda_core::domain::{Event, PasswordValidationInfo, SelectionType, TimeSlot, User};
use agenda_db::{MemTransactionManager, TransactionManager};
use agenda_events::{
    ActionKind, ChannelListener, CompletionCallback, EmitError, ErrorCallback, PublisherError,
    SlotListener, SlotPublisher, SlotSignal, DEFAULT_KEEP_ALIVE_PERIOD,
};
use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    trx: Arc<MemTransactionManager>,
    organizer: User,
    event: Event,
    slot: TimeSlot,
}

async fn fixture() -> Fixture {
    let trx = Arc::new(MemTransactionManager::new());
    let mut tx = trx.begin().await.unwrap();
    let organizer = tx
        .users()
        .create_user("Alice", "alice@example.com", &PasswordValidationInfo::new("h"))
        .await
        .unwrap();
    let event = tx
        .events()
        .create_event("Meeting", None, &organizer, SelectionType::Single)
        .await
        .unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 9, 30)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let slot = tx
        .slots()
        .create_time_slot_single(start, 30, &event)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    Fixture {
        trx,
        organizer,
        event,
        slot,
    }
}

fn publisher(trx: &Arc<MemTransactionManager>) -> SlotPublisher {
    SlotPublisher::new(trx.clone(), Arc::new(SystemClock))
}

fn drain(rx: &mut UnboundedReceiver<SlotSignal>) -> Vec<SlotSignal> {
    let mut received = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        received.push(signal);
    }
    received
}

fn message_ids(signals: &[SlotSignal]) -> Vec<u64> {
    signals
        .iter()
        .filter_map(|s| match s {
            SlotSignal::Message { id, .. } => Some(*id),
            SlotSignal::KeepAlive { .. } => None,
        })
        .collect()
}

/// Always fails to deliver.
struct BrokenListener;

impl SlotListener for BrokenListener {
    fn emit(&self, _signal: &SlotSignal) -> Result<(), EmitError> {
        Err(EmitError::new("broken pipe"))
    }

    fn on_completion(&self, _callback: CompletionCallback) {}

    fn on_error(&self, _callback: ErrorCallback) {}
}

/// Completes itself the first time it receives a signal.
struct OneShotListener {
    completion: Mutex<Vec<CompletionCallback>>,
    received: Mutex<usize>,
}

impl SlotListener for OneShotListener {
    fn emit(&self, _signal: &SlotSignal) -> Result<(), EmitError> {
        *self.received.lock().unwrap() += 1;
        let callbacks = std::mem::take(&mut *self.completion.lock().unwrap());
        for callback in callbacks {
            callback();
        }
        Ok(())
    }

    fn on_completion(&self, callback: CompletionCallback) {
        self.completion.lock().unwrap().push(callback);
    }

    fn on_error(&self, _callback: ErrorCallback) {}
}

// ---------------------------------------------------------------------------
// Registration and fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_reaches_all_listeners_until_one_completes() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);

    let (first, mut first_rx) = ChannelListener::channel();
    let (second, mut second_rx) = ChannelListener::channel();
    let first = Arc::new(first);
    publisher.add_listener(f.event.id, first.clone()).await.unwrap();
    publisher
        .add_listener(f.event.id, Arc::new(second))
        .await
        .unwrap();
    assert_eq!(publisher.listener_count(f.event.id), 2);

    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserJoined, None);

    let to_first = drain(&mut first_rx);
    let to_second = drain(&mut second_rx);
    assert_eq!(message_ids(&to_first), vec![1]);
    assert_eq!(to_first, to_second);
    assert_matches!(
        &to_first[0],
        SlotSignal::Message { data, .. } if data.action == ActionKind::UserJoined
            && data.slot_id == f.slot.id
            && data.user_email == "alice@example.com"
    );

    first.complete();
    assert_eq!(publisher.listener_count(f.event.id), 1);

    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserLeft, None);
    assert!(drain(&mut first_rx).is_empty());
    assert_eq!(message_ids(&drain(&mut second_rx)), vec![2]);
}

#[tokio::test]
async fn listeners_only_receive_their_event() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);
    let mut tx = f.trx.begin().await.unwrap();
    let other = tx
        .events()
        .create_event("Other", None, &f.organizer, SelectionType::Multiple)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let (listener, mut rx) = ChannelListener::channel();
    publisher.add_listener(other.id, Arc::new(listener)).await.unwrap();

    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserJoined, None);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn add_listener_to_unknown_event_fails() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);
    let (listener, _rx) = ChannelListener::channel();

    let result = publisher.add_listener(f.event.id + 100, Arc::new(listener)).await;
    assert_matches!(result, Err(PublisherError::EventNotFound));
}

#[tokio::test]
async fn failing_listener_does_not_block_others() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);
    let (healthy, mut rx) = ChannelListener::channel();

    publisher.add_listener(f.event.id, Arc::new(BrokenListener)).await.unwrap();
    publisher.add_listener(f.event.id, Arc::new(healthy)).await.unwrap();

    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserJoined, None);
    assert_eq!(message_ids(&drain(&mut rx)), vec![1]);
}

#[tokio::test]
async fn listener_can_deregister_from_inside_emit() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);
    let one_shot = Arc::new(OneShotListener {
        completion: Mutex::new(Vec::new()),
        received: Mutex::new(0),
    });

    publisher.add_listener(f.event.id, one_shot.clone()).await.unwrap();
    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserJoined, None);
    publisher.publish(&f.event, &f.slot, &f.organizer, ActionKind::UserLeft, None);

    assert_eq!(*one_shot.received.lock().unwrap(), 1);
    assert_eq!(publisher.listener_count(f.event.id), 0);
}

#[tokio::test]
async fn explicit_removal_is_idempotent() {
    let f = fixture().await;
    let publisher = publisher(&f.trx);
    let (listener, _rx) = ChannelListener::channel();
    let id = publisher.add_listener(f.event.id, Arc::new(listener)).await.unwrap();

    assert!(publisher.remove_listener(f.event.id, id));
    assert!(!publisher.remove_listener(f.event.id, id));
}

// ---------------------------------------------------------------------------
// Keep-alive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn keep_alive_reaches_every_event_with_clock_timestamp() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 9, 30, 8, 0, 0).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
    let publisher = SlotPublisher::new(f.trx.clone(), clock);

    let (listener, mut rx) = ChannelListener::channel();
    publisher.add_listener(f.event.id, Arc::new(listener)).await.unwrap();
    publisher.keep_alive();

    assert_eq!(drain(&mut rx), vec![SlotSignal::KeepAlive { timestamp: now }]);
}

#[tokio::test(start_paused = true)]
async fn heartbeat_runs_on_schedule_until_shutdown() {
    let f = fixture().await;
    let publisher = SlotPublisher::start(f.trx.clone(), Arc::new(SystemClock), Duration::from_secs(2));
    let (listener, mut rx) = ChannelListener::channel();
    publisher.add_listener(f.event.id, Arc::new(listener)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(4100)).await;
    let beats = drain(&mut rx);
    assert_eq!(beats.len(), 2);
    assert!(beats
        .iter()
        .all(|s| matches!(s, SlotSignal::KeepAlive { .. })));

    publisher.shutdown().await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_heartbeat_period_uses_the_default() {
    let f = fixture().await;
    let publisher = SlotPublisher::start(f.trx.clone(), Arc::new(SystemClock), Duration::ZERO);
    let (listener, mut rx) = ChannelListener::channel();
    publisher.add_listener(f.event.id, Arc::new(listener)).await.unwrap();

    tokio::time::sleep(DEFAULT_KEEP_ALIVE_PERIOD * 2 + Duration::from_millis(100)).await;
    assert_eq!(drain(&mut rx).len(), 2);

    publisher.shutdown().await;
}
