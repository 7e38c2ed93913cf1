//! Event admin handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{AdminResponse, AssignAdminRequest};
use crate::app_state::AppState;
use crate::domain::{EventId, UserId};
use crate::error::{ErrorResponse, TicketingError};

/// `POST /events/:id/admins`: Grant a user admin rights over an event.
///
/// # Errors
///
/// Returns [`TicketingError::DuplicateAdmin`] if the grant exists, or the
/// matching `*NotFound` error for an unknown user or event.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/admins",
    tag = "Admins",
    summary = "Assign an event admin",
    params(("id" = i64, Path, description = "Event id")),
    request_body = AssignAdminRequest,
    responses(
        (status = 201, description = "Admin assigned", body = AdminResponse),
        (status = 404, description = "User or event not found", body = ErrorResponse),
        (status = 409, description = "User is already an admin of the event", body = ErrorResponse),
    )
)]
pub async fn assign_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignAdminRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let entry = state
        .ticketing
        .assign_admin(UserId::new(req.user_id), EventId::new(id))
        .await?;
    Ok((StatusCode::CREATED, Json(AdminResponse::from(entry))))
}

/// `GET /events/:id/admins`: Admins of an event.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/admins",
    tag = "Admins",
    summary = "List event admins",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Admins ordered by assignment time", body = Vec<AdminResponse>),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_admins(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let entries = state.ticketing.list_admins(EventId::new(id)).await?;
    let data: Vec<AdminResponse> = entries.into_iter().map(AdminResponse::from).collect();
    Ok(Json(data))
}

/// `DELETE /events/:id/admins/:user_id`: Revoke an admin grant.
///
/// # Errors
///
/// Returns [`TicketingError::AdminNotFound`] if the grant does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/admins/{user_id}",
    tag = "Admins",
    summary = "Revoke an event admin",
    params(
        ("id" = i64, Path, description = "Event id"),
        ("user_id" = i64, Path, description = "Admin user id"),
    ),
    responses(
        (status = 204, description = "Admin revoked"),
        (status = 404, description = "No such admin grant", body = ErrorResponse),
    )
)]
pub async fn revoke_admin(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, TicketingError> {
    state
        .ticketing
        .revoke_admin(UserId::new(user_id), EventId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/admins", get(list_admins).post(assign_admin))
        .route("/events/{id}/admins/{user_id}", delete(revoke_admin))
}
