//! Injectable time source.
//!
//! Token validity depends on "now"; services take a [`Clock`] instead of
//! calling `Utc::now()` so tests can move time forward deterministically.

use std::sync::Mutex;

use chrono::Utc;

use crate::types::Timestamp;

/// A source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock frozen at a given instant until explicitly moved.
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(time: Timestamp) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Replace the current instant.
    pub fn set(&self, time: Timestamp) {
        *self.lock() = time;
    }

    /// Move the current instant forward by `by`.
    pub fn advance(&self, by: chrono::Duration) {
        let mut time = self.lock();
        *time += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        // A poisoned clock still holds a valid instant.
        self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }
}
