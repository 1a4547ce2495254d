//! Server-sent event streams for `/api/events/{id}/listen`.
//!
//! Each request registers a [`ChannelListener`] with the publisher. Messages
//! go out as `message` events carrying the message id and the JSON signal;
//! heartbeats go out as comments. Dropping the response body (client
//! disconnect) completes the listener, which deregisters it. Streams end
//! when the server begins shutting down.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use agenda_core::types::DbId;
use agenda_events::{ChannelListener, SlotListener, SlotSignal};
use axum::extract::{Path, State};
use axum::response::sse::{Event as SseEvent, Sse};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/events/{id}/listen
pub async fn listen(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let (listener, receiver) = ChannelListener::channel();
    let listener = Arc::new(listener);
    let registered: Arc<dyn SlotListener> = listener.clone();
    state.publisher.add_listener(event_id, registered).await?;

    let stream = ListenerStream { receiver, listener }
        .take_until(state.shutdown.clone().cancelled_owned());
    Ok(Sse::new(stream))
}

/// Adapts a listener's channel into SSE frames.
///
/// Completes the listener when dropped.
pub struct ListenerStream {
    receiver: UnboundedReceiver<SlotSignal>,
    listener: Arc<ChannelListener>,
}

impl Stream for ListenerStream {
    type Item = Result<SseEvent, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver
            .poll_recv(cx)
            .map(|signal| signal.map(|s| Ok(to_sse_event(&s))))
    }
}

impl Drop for ListenerStream {
    fn drop(&mut self) {
        self.listener.complete();
    }
}

/// Render one signal as an SSE frame.
pub fn to_sse_event(signal: &SlotSignal) -> SseEvent {
    match signal {
        SlotSignal::Message { id, .. } => {
            let event = SseEvent::default().event("message").id(id.to_string());
            match event.json_data(signal) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(message_id = id, error = %e, "Failed to encode slot signal");
                    SseEvent::default().comment("encoding-error")
                }
            }
        }
        SlotSignal::KeepAlive { timestamp } => SseEvent::default().comment(timestamp.to_rfc3339()),
    }
}
