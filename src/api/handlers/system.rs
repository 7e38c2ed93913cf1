//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the store does not answer.
    pub status: &'static str,
    /// Backing store (`postgres` or `memory`), absent when unreachable.
    pub storage: Option<&'static str>,
    /// Check time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: &'static str,
}

/// `GET /health`: Service and storage health.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Pings the backing store. Returns 503 with status `degraded` when it does not answer.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, label, storage) = match state.ticketing.storage_health().await {
        Ok(storage) => (StatusCode::OK, "healthy", Some(storage)),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };
    (
        status,
        Json(HealthResponse {
            status: label,
            storage,
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
