//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use agenda_core::clock::{Clock, FixedClock};
use agenda_core::config::UsersDomainConfig;
use agenda_core::domain::User;
use agenda_core::types::{LocalDateTime, Timestamp};
use agenda_db::{MemTransactionManager, TransactionManager};
use agenda_events::SlotPublisher;
use agenda_service::{EventService, UserAuthService};
use chrono::{NaiveDate, TimeZone, Utc};

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub clock: Arc<FixedClock>,
    pub publisher: Arc<SlotPublisher>,
    pub auth: UserAuthService,
    pub events: EventService,
}

/// Services over a fresh in-memory store with a frozen clock.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(MemTransactionManager::new()))
}

/// Services over the given store with a frozen clock.
pub fn build_test_app_with(trx: Arc<dyn TransactionManager>) -> TestApp {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 9, 30, 8, 0, 0).unwrap(),
    ));
    let publisher = Arc::new(SlotPublisher::new(trx.clone(), clock.clone()));
    TestApp {
        auth: UserAuthService::new(trx.clone(), UsersDomainConfig::default(), clock.clone()),
        events: EventService::new(trx, publisher.clone()),
        clock,
        publisher,
    }
}

impl TestApp {
    pub fn clock_now(&self) -> Timestamp {
        self.clock.now()
    }

    pub async fn register(&self, name: &str) -> User {
        let email = format!("{}@example.com", name.to_lowercase());
        self.auth
            .create_user(name, &email, PASSWORD)
            .await
            .expect("registration should succeed")
    }
}

pub fn at(hour: u32) -> LocalDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}
