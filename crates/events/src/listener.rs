//! Listener capability and a channel-backed implementation.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::signal::SlotSignal;

/// Failure to deliver a signal to one listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EmitError(String);

impl EmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type CompletionCallback = Box<dyn FnOnce() + Send>;
pub type ErrorCallback = Box<dyn FnOnce(EmitError) + Send>;

/// A receiver of slot signals, implemented by the streaming transport.
///
/// The publisher registers completion and error callbacks on every listener
/// it accepts; whichever terminal event the listener reaches must invoke the
/// matching callbacks exactly once.
pub trait SlotListener: Send + Sync {
    fn emit(&self, signal: &SlotSignal) -> Result<(), EmitError>;

    fn on_completion(&self, callback: CompletionCallback);

    fn on_error(&self, callback: ErrorCallback);
}

#[derive(Default)]
struct Callbacks {
    completion: Vec<CompletionCallback>,
    error: Vec<ErrorCallback>,
    terminated: bool,
}

/// Forwards every emitted signal into an unbounded channel.
///
/// The owner of the receiving half calls [`complete`](Self::complete) or
/// [`fail`](Self::fail) when the stream ends. Callbacks registered after
/// completion run immediately.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<SlotSignal>,
    callbacks: Mutex<Callbacks>,
}

impl ChannelListener {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SlotSignal>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let listener = Self {
            sender,
            callbacks: Mutex::new(Callbacks::default()),
        };
        (listener, receiver)
    }

    /// Take the pending callbacks and mark the listener terminated.
    fn terminate(&self) -> Option<Callbacks> {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        if callbacks.terminated {
            return None;
        }
        let pending = std::mem::take(&mut *callbacks);
        callbacks.terminated = true;
        Some(pending)
    }

    /// Signal normal end of the stream. Idempotent.
    pub fn complete(&self) {
        if let Some(pending) = self.terminate() {
            for callback in pending.completion {
                callback();
            }
        }
    }

    /// Signal abnormal end of the stream. Ignored once terminated.
    pub fn fail(&self, error: EmitError) {
        if let Some(pending) = self.terminate() {
            for callback in pending.error {
                callback(error.clone());
            }
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .terminated
    }
}

impl SlotListener for ChannelListener {
    fn emit(&self, signal: &SlotSignal) -> Result<(), EmitError> {
        self.sender
            .send(signal.clone())
            .map_err(|_| EmitError::new("listener channel is closed"))
    }

    fn on_completion(&self, callback: CompletionCallback) {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        if callbacks.terminated {
            drop(callbacks);
            callback();
        } else {
            callbacks.completion.push(callback);
        }
    }

    fn on_error(&self, callback: ErrorCallback) {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        if !callbacks.terminated {
            callbacks.error.push(callback);
        }
    }
}
