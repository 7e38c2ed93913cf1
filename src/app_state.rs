//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::TicketingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ticketing service for all business logic.
    pub ticketing: Arc<TicketingService>,
}
