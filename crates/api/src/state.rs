use std::sync::Arc;

use agenda_core::clock::Clock;
use agenda_db::{DbPool, TransactionManager};
use agenda_events::SlotPublisher;
use agenda_service::{EventService, UserAuthService};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via Axum's `State` extractor.
///
/// Wrapped in `Clone` so Axum can distribute it across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool, present only with the PostgreSQL backing.
    pub pool: Option<DbPool>,
    pub auth: Arc<UserAuthService>,
    pub events: Arc<EventService>,
    /// Registry of `/listen` streams per event.
    pub publisher: Arc<SlotPublisher>,
    /// Cancelled when the server starts shutting down; ends open streams.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the services over one transaction manager.
    pub fn new(
        config: ServerConfig,
        pool: Option<DbPool>,
        trx: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
        publisher: Arc<SlotPublisher>,
    ) -> Self {
        let auth = UserAuthService::new(Arc::clone(&trx), config.users.clone(), clock);
        let events = EventService::new(trx, Arc::clone(&publisher));
        Self {
            config: Arc::new(config),
            pool,
            auth: Arc::new(auth),
            events: Arc::new(events),
            publisher,
            shutdown: CancellationToken::new(),
        }
    }
}
