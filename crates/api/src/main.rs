use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use agenda_api::config::ServerConfig;
use agenda_api::router::build_app_router;
use agenda_api::state::AppState;
use agenda_core::clock::{Clock, SystemClock};
use agenda_db::{MemTransactionManager, PgTransactionManager, TransactionManager};
use agenda_events::SlotPublisher;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agenda_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (pool, trx) = match &config.database_url {
        Some(database_url) => {
            let pool = agenda_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            agenda_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            agenda_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let trx: Arc<dyn TransactionManager> =
                Arc::new(PgTransactionManager::new(pool.clone()));
            (Some(pool), trx)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            let trx: Arc<dyn TransactionManager> = Arc::new(MemTransactionManager::new());
            (None, trx)
        }
    };

    // --- Publisher ---
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let publisher = Arc::new(SlotPublisher::start(
        Arc::clone(&trx),
        Arc::clone(&clock),
        Duration::from_secs(config.keep_alive_secs),
    ));

    // --- App state ---
    let state = AppState::new(config.clone(), pool.clone(), trx, clock, Arc::clone(&publisher));
    let shutdown = state.shutdown.clone();
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Open event streams would otherwise hold the server open.
            shutdown.cancel();
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    publisher.shutdown().await;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
