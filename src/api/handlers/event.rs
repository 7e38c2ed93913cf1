//! Event handlers: create, list, get, update, delete, availability.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    AvailabilityResponse, EventDetailResponse, EventListResponse, EventRequest, EventResponse,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, TicketingError};

/// `POST /events`: Create an event.
///
/// # Errors
///
/// Returns [`TicketingError::InvalidRequest`] if validation fails.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates an event. `capacity` may be omitted for an unlimited event; `price` is a decimal string and defaults to 0.",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse,
            headers(("location" = String, description = "Canonical URL of the event"))),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let event = state.ticketing.create_event(req.into_new_event()?).await?;
    let location = event.absolute_url();
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EventResponse::from(event)),
    ))
}

/// `GET /events`: List events ordered by start time.
///
/// # Errors
///
/// Returns [`TicketingError::PersistenceError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns a paginated list of events ordered by start time.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, TicketingError> {
    let page = state
        .ticketing
        .list_events(params.offset(), params.limit())
        .await?;
    Ok(Json(EventListResponse {
        data: page.events.into_iter().map(EventResponse::from).collect(),
        pagination: params.meta(page.total),
    }))
}

/// `GET /events/:id`: Event details with seat aggregates.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event details", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let overview = state.ticketing.event_overview(EventId::new(id)).await?;
    Ok(Json(EventDetailResponse::from(overview)))
}

/// `PUT /events/:id`: Replace an event's editable fields.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id or
/// [`TicketingError::InvalidRequest`] if validation fails.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let event = state
        .ticketing
        .update_event(EventId::new(id), req.into_new_event()?)
        .await?;
    Ok(Json(EventResponse::from(event)))
}

/// `DELETE /events/:id`: Delete an event with its tickets and admins.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Deletes the event together with all of its tickets and admin grants.",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    state.ticketing.delete_event(EventId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /events/:id/availability`: Seats sold and seats left.
///
/// # Errors
///
/// Returns [`TicketingError::EventNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/availability",
    tag = "Events",
    summary = "Get seat availability",
    description = "`seats_available` is null for events without a capacity. Cancelled tickets still count as sold.",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Seat aggregates", body = AvailabilityResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let overview = state.ticketing.event_overview(EventId::new(id)).await?;
    Ok(Json(AvailabilityResponse::from(overview)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/availability", get(get_availability))
}
