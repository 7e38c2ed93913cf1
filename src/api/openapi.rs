//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::handlers::{admin, event, system, ticket, user};

/// Collected OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "event-ticketing", description = "Events, event admins and ticket sales"),
    paths(
        system::health_handler,
        user::create_user,
        user::get_user,
        user::delete_user,
        user::list_user_tickets,
        user::list_user_admin_events,
        event::create_event,
        event::list_events,
        event::get_event,
        event::update_event,
        event::delete_event,
        event::get_availability,
        admin::assign_admin,
        admin::list_admins,
        admin::revoke_admin,
        ticket::purchase_ticket,
        ticket::list_event_tickets,
        ticket::get_ticket,
        ticket::update_ticket_status,
        ticket::delete_ticket,
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Users", description = "Ticket buyers and event admins"),
        (name = "Events", description = "Events and seat availability"),
        (name = "Admins", description = "Per-event admin grants"),
        (name = "Tickets", description = "Ticket purchases and lifecycle"),
    )
)]
pub struct ApiDoc;
