//! event-ticketing server entry point.
//!
//! Starts the Axum HTTP server backed by PostgreSQL, or by the in-memory
//! store when `PERSISTENCE_ENABLED=false`.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use event_ticketing::api;
use event_ticketing::app_state::AppState;
use event_ticketing::config::TicketingConfig;
use event_ticketing::persistence::{InMemoryStore, PostgresStore, TicketingStore};
use event_ticketing::service::TicketingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = TicketingConfig::from_env().context("invalid LISTEN_ADDR")?;
    tracing::info!(addr = %config.listen_addr, "starting event-ticketing");

    // Build persistence layer
    let store: Arc<dyn TicketingStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config)
            .await
            .context("failed to connect to PostgreSQL")?;
        if config.run_migrations {
            store.migrate().await.context("failed to run migrations")?;
            tracing::info!("migrations applied");
        }
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        Arc::new(InMemoryStore::new())
    };

    // Build application state
    let app_state = AppState {
        ticketing: Arc::new(TicketingService::new(store)),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
