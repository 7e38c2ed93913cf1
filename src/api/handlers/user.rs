//! User handlers: register, get, delete, and per-user listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AdminRoleResponse, CreateUserRequest, TicketResponse, UserResponse};
use crate::app_state::AppState;
use crate::domain::{NewUser, UserId};
use crate::error::{ErrorResponse, TicketingError};

/// `POST /users`: Register a user.
///
/// # Errors
///
/// Returns [`TicketingError::InvalidRequest`] for a blank username or
/// [`TicketingError::Conflict`] if it is taken.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Register a user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid username", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, TicketingError> {
    let user = state
        .ticketing
        .register_user(NewUser::new(req.username))
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users/:id`: Get a user.
///
/// # Errors
///
/// Returns [`TicketingError::UserNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Get a user",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let user = state.ticketing.get_user(UserId::new(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// `DELETE /users/:id`: Delete a user with their tickets and admin roles.
///
/// # Errors
///
/// Returns [`TicketingError::UserNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Delete a user",
    description = "Deletes the user together with every ticket they bought and every admin role they hold.",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    state.ticketing.delete_user(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/:id/tickets`: Tickets bought by a user.
///
/// # Errors
///
/// Returns [`TicketingError::UserNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/tickets",
    tag = "Users",
    summary = "List a user's tickets",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Tickets ordered by id", body = Vec<TicketResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn list_user_tickets(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let tickets = state
        .ticketing
        .list_tickets_by_buyer(UserId::new(id))
        .await?;
    let data: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
    Ok(Json(data))
}

/// `GET /users/:id/admin-events`: Admin roles held by a user.
///
/// # Errors
///
/// Returns [`TicketingError::UserNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/admin-events",
    tag = "Users",
    summary = "List a user's admin roles",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Admin roles", body = Vec<AdminRoleResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn list_user_admin_events(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TicketingError> {
    let roles = state.ticketing.list_admin_events(UserId::new(id)).await?;
    let data: Vec<AdminRoleResponse> = roles.into_iter().map(AdminRoleResponse::from).collect();
    Ok(Json(data))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/{id}/tickets", get(list_user_tickets))
        .route("/users/{id}/admin-events", get(list_user_admin_events))
}
