//! Persistence layer: the [`TicketingStore`] data-access interface.
//!
//! Two implementations exist. [`postgres::PostgresStore`] is backed by
//! `sqlx::PgPool` and runs every multi-row write in a transaction.
//! [`memory::InMemoryStore`] keeps all tables behind one
//! [`tokio::sync::RwLock`] and serves as the store when persistence is
//! disabled, and in tests.
//!
//! Both implementations perform cascades explicitly: deleting an event or a
//! user removes the dependent ticket and admin rows in the same unit of
//! work.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::{
    Event, EventAdmin, EventId, EventPage, NewEvent, NewTicket, NewUser, Ticket, TicketId, TicketStatus,
    User, UserId,
};
use crate::error::TicketingError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Data-access interface for users, events, admins and tickets.
///
/// Implementations must return the matching `*NotFound` error for unknown
/// ids, including dangling references on create.
#[async_trait]
pub trait TicketingStore: Send + Sync + Debug {
    /// Short name of the backing storage, reported by the health check.
    fn backend(&self) -> &'static str;

    /// Round-trips to the storage without touching any record.
    async fn ping(&self) -> Result<(), TicketingError>;

    /// Registers a user. Usernames are unique.
    async fn create_user(&self, user: NewUser) -> Result<User, TicketingError>;

    /// Fetches a user by id.
    async fn get_user(&self, user_id: UserId) -> Result<User, TicketingError>;

    /// Deletes a user together with their tickets and admin roles.
    async fn delete_user(&self, user_id: UserId) -> Result<(), TicketingError>;

    /// Inserts an event; the store assigns id and timestamps.
    async fn create_event(&self, event: NewEvent) -> Result<Event, TicketingError>;

    /// Fetches an event by id.
    async fn get_event(&self, event_id: EventId) -> Result<Event, TicketingError>;

    /// Returns up to `limit` events ordered by start time, then id,
    /// skipping the first `offset`.
    async fn list_events(&self, offset: u64, limit: u64) -> Result<EventPage, TicketingError>;

    /// Replaces the editable fields of an event and bumps `updated_at`.
    async fn update_event(
        &self,
        event_id: EventId,
        event: NewEvent,
    ) -> Result<Event, TicketingError>;

    /// Deletes an event together with its tickets and admin rows.
    async fn delete_event(&self, event_id: EventId) -> Result<(), TicketingError>;

    /// Sum of `quantity` over every ticket of the event, whatever its
    /// status. Zero when there are none.
    async fn tickets_sold(&self, event_id: EventId) -> Result<u64, TicketingError>;

    /// Grants `user_id` admin rights over `event_id`.
    async fn assign_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<EventAdmin, TicketingError>;

    /// Lists the admins of an event ordered by assignment time.
    async fn list_admins(&self, event_id: EventId) -> Result<Vec<EventAdmin>, TicketingError>;

    /// Lists the admin roles held by a user.
    async fn list_admin_events(&self, user_id: UserId)
    -> Result<Vec<EventAdmin>, TicketingError>;

    /// Revokes an admin role.
    async fn revoke_admin(&self, user_id: UserId, event_id: EventId)
    -> Result<(), TicketingError>;

    /// Records a ticket in [`TicketStatus::Pending`].
    ///
    /// The capacity check and the insert happen atomically: a ticket whose
    /// quantity exceeds the seats left fails with
    /// [`TicketingError::InsufficientCapacity`] and nothing is written.
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, TicketingError>;

    /// Fetches a ticket by id.
    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, TicketingError>;

    /// Lists the tickets of an event ordered by id.
    async fn list_tickets_by_event(&self, event_id: EventId)
    -> Result<Vec<Ticket>, TicketingError>;

    /// Lists the tickets bought by a user ordered by id.
    async fn list_tickets_by_buyer(&self, buyer_id: UserId)
    -> Result<Vec<Ticket>, TicketingError>;

    /// Moves a ticket to `status`, validating the transition against the
    /// current status under the same lock or transaction.
    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, TicketingError>;

    /// Deletes a single ticket.
    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<(), TicketingError>;
}
