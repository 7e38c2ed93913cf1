//! Ticket handlers: purchase, list, get, status change, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{
    PurchaseTicketRequest, TicketResponse, UpdateTicketStatusRequest, parse_decimal,
};
use crate::app_state::AppState;
use crate::domain::{EventId, TicketId, TicketStatus, UserId};
use crate::error::{ErrorResponse, TicketingError};

/// `POST /events/:id/tickets`: Buy seats for an event.
///
/// # Errors
///
/// Returns [`TicketingError::InsufficientCapacity`] when the event cannot
/// seat the quantity, [`TicketingError::InvalidRequest`] for a bad quantity
/// or total, or the matching `*NotFound` error.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/tickets",
    tag = "Tickets",
    summary = "Purchase tickets",
    description = "Records a PENDING ticket. When `total` is omitted it is computed as price × quantity. The capacity check and the insert are atomic.",
    params(("id" = i64, Path, description = "Event id")),
    request_body = PurchaseTicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = TicketResponse),
        (status = 400, description = "Invalid quantity or total", body = ErrorResponse),
        (status = 404, description = "Event or buyer not found", body = ErrorResponse),
        (status = 422, description = "Not enough seats left", body = ErrorResponse),
    )
)]
pub async fn purchase_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PurchaseTicketRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let total = req
        .total
        .as_deref()
        .map(|raw| parse_decimal(raw, "total"))
        .transpose()?;
    let ticket = state
        .ticketing
        .purchase_ticket(EventId::new(id), UserId::new(req.buyer_id), req.quantity, total)
        .await?;
    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

/// `GET /events/:id/tickets`: Tickets of an event.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/tickets",
    tag = "Tickets",
    summary = "List event tickets",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Tickets ordered by id", body = Vec<TicketResponse>),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_event_tickets(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let tickets = state
        .ticketing
        .list_tickets_by_event(EventId::new(id))
        .await?;
    let data: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
    Ok(Json(data))
}

/// `GET /tickets/:id`: Get a ticket with its display label.
///
/// # Errors
///
/// Returns [`TicketingError::TicketNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    tag = "Tickets",
    summary = "Get a ticket",
    params(("id" = i64, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket", body = TicketResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
    )
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let ticket = state.ticketing.get_ticket(TicketId::new(id)).await?;
    let label = state.ticketing.ticket_label(&ticket).await?;
    Ok(Json(TicketResponse::from(ticket).with_label(label)))
}

/// `PATCH /tickets/:id/status`: Move a ticket along its lifecycle.
///
/// # Errors
///
/// Returns [`TicketingError::InvalidStatus`] for an unknown status name,
/// [`TicketingError::InvalidStatusTransition`] for a disallowed move, or
/// [`TicketingError::TicketNotFound`].
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}/status",
    tag = "Tickets",
    summary = "Change ticket status",
    description = "Allowed moves: PENDING → PAID, PENDING → CANCELLED, PAID → CANCELLED.",
    params(("id" = i64, Path, description = "Ticket id")),
    request_body = UpdateTicketStatusRequest,
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse),
    )
)]
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let status: TicketStatus = req.status.trim().parse()?;
    let ticket = state
        .ticketing
        .update_ticket_status(TicketId::new(id), status)
        .await?;
    Ok(Json(TicketResponse::from(ticket)))
}

/// `DELETE /tickets/:id`: Delete a ticket.
///
/// # Errors
///
/// Returns [`TicketingError::TicketNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    tag = "Tickets",
    summary = "Delete a ticket",
    params(("id" = i64, Path, description = "Ticket id")),
    responses(
        (status = 204, description = "Ticket deleted"),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
    )
)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    state.ticketing.delete_ticket(TicketId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/tickets",
            get(list_event_tickets).post(purchase_ticket),
        )
        .route("/tickets/{id}", get(get_ticket).delete(delete_ticket))
        .route("/tickets/{id}/status", patch(update_ticket_status))
}
