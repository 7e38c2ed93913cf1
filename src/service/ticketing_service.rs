//! Ticketing service: validates input, computes aggregates, logs mutations.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{
    Event, EventAdmin, EventId, EventPage, NewEvent, NewTicket, NewUser, Ticket, TicketId,
    TicketStatus, User, UserId,
};
use crate::error::TicketingError;
use crate::persistence::TicketingStore;

/// An event together with its seat aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOverview {
    /// The event record.
    pub event: Event,
    /// Sum of quantities over all of its tickets.
    pub tickets_sold: u64,
    /// Seats left; `None` when the event is unlimited.
    pub seats_available: Option<u64>,
}

/// An admin grant resolved against its user and event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEntry {
    /// The grant.
    pub admin: EventAdmin,
    /// The admin's username.
    pub username: String,
    /// Display label, e.g. `"lucia — admin of Night Trail"`.
    pub label: String,
}

/// Orchestration layer over a [`TicketingStore`].
///
/// Stateless coordinator: every method validates its input, delegates to
/// the store, and logs the outcome. Constraint enforcement that must be
/// atomic (capacity, status transitions, cascades) lives in the store.
#[derive(Debug, Clone)]
pub struct TicketingService {
    store: Arc<dyn TicketingStore>,
}

impl TicketingService {
    /// Creates a new `TicketingService`.
    #[must_use]
    pub fn new(store: Arc<dyn TicketingStore>) -> Self {
        Self { store }
    }

    /// Checks that the store answers and returns its backend name.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::PersistenceError`] if the store is
    /// unreachable.
    pub async fn storage_health(&self) -> Result<&'static str, TicketingError> {
        self.store.ping().await?;
        Ok(self.store.backend())
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] for a blank username and
    /// [`TicketingError::Conflict`] if it is taken.
    pub async fn register_user(&self, user: NewUser) -> Result<User, TicketingError> {
        user.validate()?;
        let user = self.store.create_user(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Fetches a user.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::UserNotFound`] for an unknown id.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, TicketingError> {
        self.store.get_user(user_id).await
    }

    /// Deletes a user along with their tickets and admin roles.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::UserNotFound`] for an unknown id.
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), TicketingError> {
        self.store.delete_user(user_id).await?;
        tracing::info!(%user_id, "user deleted");
        Ok(())
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] if the fields fail
    /// validation.
    pub async fn create_event(&self, event: NewEvent) -> Result<Event, TicketingError> {
        event.validate()?;
        let event = self.store.create_event(event).await?;
        tracing::info!(event_id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    /// Fetches an event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event, TicketingError> {
        self.store.get_event(event_id).await
    }

    /// Lists one page of events ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns a [`TicketingError::PersistenceError`] on store failure.
    pub async fn list_events(&self, offset: u64, limit: u64) -> Result<EventPage, TicketingError> {
        self.store.list_events(offset, limit).await
    }

    /// Replaces the editable fields of an event.
    ///
    /// Lowering the capacity below the seats already sold is allowed;
    /// availability then reads as zero.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] on invalid fields or
    /// [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn update_event(
        &self,
        event_id: EventId,
        event: NewEvent,
    ) -> Result<Event, TicketingError> {
        event.validate()?;
        let event = self.store.update_event(event_id, event).await?;
        tracing::info!(%event_id, "event updated");
        Ok(event)
    }

    /// Deletes an event together with its tickets and admin rows.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn delete_event(&self, event_id: EventId) -> Result<(), TicketingError> {
        self.store.delete_event(event_id).await?;
        tracing::info!(%event_id, "event deleted");
        Ok(())
    }

    /// Sum of `quantity` over every ticket of the event.
    ///
    /// Pending and cancelled tickets are included.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn tickets_sold(&self, event_id: EventId) -> Result<u64, TicketingError> {
        self.store.tickets_sold(event_id).await
    }

    /// Seats left for the event, or `None` when it is unlimited.
    ///
    /// A read at call time: a concurrent purchase may consume the seats
    /// before the caller acts on the value. Purchases themselves are
    /// checked atomically by the store.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn seats_available(&self, event_id: EventId) -> Result<Option<u64>, TicketingError> {
        Ok(self.event_overview(event_id).await?.seats_available)
    }

    /// The event with both aggregates computed from one sold count.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn event_overview(&self, event_id: EventId) -> Result<EventOverview, TicketingError> {
        let event = self.store.get_event(event_id).await?;
        let tickets_sold = self.store.tickets_sold(event_id).await?;
        let seats_available = event.seats_available(tickets_sold);
        Ok(EventOverview {
            event,
            tickets_sold,
            seats_available,
        })
    }

    /// Grants a user admin rights over an event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::DuplicateAdmin`] if the grant exists, or
    /// the matching `*NotFound` error for an unknown user or event.
    pub async fn assign_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<AdminEntry, TicketingError> {
        let admin = self.store.assign_admin(user_id, event_id).await?;
        let entry = self.resolve_admin(admin).await?;
        tracing::info!(%user_id, %event_id, label = %entry.label, "admin assigned");
        Ok(entry)
    }

    /// Lists the admins of an event with their usernames.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn list_admins(&self, event_id: EventId) -> Result<Vec<AdminEntry>, TicketingError> {
        let admins = self.store.list_admins(event_id).await?;
        let mut entries = Vec::with_capacity(admins.len());
        for admin in admins {
            entries.push(self.resolve_admin(admin).await?);
        }
        Ok(entries)
    }

    /// Lists the admin roles a user holds.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::UserNotFound`] for an unknown id.
    pub async fn list_admin_events(
        &self,
        user_id: UserId,
    ) -> Result<Vec<EventAdmin>, TicketingError> {
        self.store.list_admin_events(user_id).await
    }

    /// Revokes an admin grant.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::AdminNotFound`] if the grant does not exist.
    pub async fn revoke_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), TicketingError> {
        self.store.revoke_admin(user_id, event_id).await?;
        tracing::info!(%user_id, %event_id, "admin revoked");
        Ok(())
    }

    /// Records a purchase of `quantity` seats.
    ///
    /// When `total` is `None` it is computed as `price × quantity` from the
    /// event's current price.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] for a zero quantity or an
    /// invalid total, [`TicketingError::InsufficientCapacity`] when the
    /// event cannot seat the quantity, or the matching `*NotFound` error
    /// for an unknown event or buyer.
    pub async fn purchase_ticket(
        &self,
        event_id: EventId,
        buyer_id: UserId,
        quantity: u32,
        total: Option<Decimal>,
    ) -> Result<Ticket, TicketingError> {
        if quantity == 0 {
            return Err(TicketingError::InvalidRequest(
                "quantity must be at least 1".to_string(),
            ));
        }
        let total = match total {
            Some(total) => total,
            None => {
                let event = self.store.get_event(event_id).await?;
                event
                    .price
                    .checked_mul(Decimal::from(quantity))
                    .ok_or_else(|| {
                        TicketingError::InvalidRequest("total overflows".to_string())
                    })?
            }
        };

        let draft = NewTicket {
            event_id,
            buyer_id,
            quantity,
            total,
        };
        draft.validate()?;

        match self.store.create_ticket(draft).await {
            Ok(ticket) => {
                tracing::info!(
                    ticket_id = %ticket.id,
                    %event_id,
                    %buyer_id,
                    quantity,
                    total = %ticket.total,
                    "ticket purchased"
                );
                Ok(ticket)
            }
            Err(err @ TicketingError::InsufficientCapacity { .. }) => {
                tracing::warn!(%event_id, %buyer_id, quantity, error = %err, "purchase rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Fetches a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::TicketNotFound`] for an unknown id.
    pub async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, TicketingError> {
        self.store.get_ticket(ticket_id).await
    }

    /// Display label of a ticket, e.g. `"Ticket #17 | marta → Harbour 10k"`.
    ///
    /// # Errors
    ///
    /// Returns the matching `*NotFound` error if the ticket or one of its
    /// references is missing.
    pub async fn ticket_label(&self, ticket: &Ticket) -> Result<String, TicketingError> {
        let buyer = self.store.get_user(ticket.buyer_id).await?;
        let event = self.store.get_event(ticket.event_id).await?;
        Ok(ticket.label(&buyer, &event))
    }

    /// Lists the tickets of an event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::EventNotFound`] for an unknown id.
    pub async fn list_tickets_by_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        self.store.list_tickets_by_event(event_id).await
    }

    /// Lists the tickets bought by a user.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::UserNotFound`] for an unknown id.
    pub async fn list_tickets_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        self.store.list_tickets_by_buyer(buyer_id).await
    }

    /// Moves a ticket along its status lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidStatusTransition`] for an edge
    /// outside the lifecycle or [`TicketingError::TicketNotFound`].
    pub async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, TicketingError> {
        let ticket = self.store.update_ticket_status(ticket_id, status).await?;
        tracing::info!(%ticket_id, status = %ticket.status, "ticket status changed");
        Ok(ticket)
    }

    /// Deletes a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::TicketNotFound`] for an unknown id.
    pub async fn delete_ticket(&self, ticket_id: TicketId) -> Result<(), TicketingError> {
        self.store.delete_ticket(ticket_id).await?;
        tracing::info!(%ticket_id, "ticket deleted");
        Ok(())
    }

    async fn resolve_admin(&self, admin: EventAdmin) -> Result<AdminEntry, TicketingError> {
        let user = self.store.get_user(admin.user_id).await?;
        let event = self.store.get_event(admin.event_id).await?;
        let label = admin.label(&user, &event);
        Ok(AdminEntry {
            admin,
            username: user.username,
            label,
        })
    }
}
