//! In-memory implementation of the persistence layer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TicketingStore;
use crate::domain::{
    Event, EventAdmin, EventAdminId, EventId, EventPage, NewEvent, NewTicket, NewUser, Ticket, TicketId,
    TicketStatus, User, UserId,
};
use crate::error::TicketingError;

/// All tables plus their id sequences.
#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    events: BTreeMap<EventId, Event>,
    admins: BTreeMap<EventAdminId, EventAdmin>,
    tickets: BTreeMap<TicketId, Ticket>,
    last_id: i64,
}

impl Tables {
    /// Shared sequence, like a single `BIGSERIAL` per database.
    fn next_id(&mut self) -> i64 {
        self.last_id = self.last_id.saturating_add(1);
        self.last_id
    }

    fn user(&self, user_id: UserId) -> Result<&User, TicketingError> {
        self.users
            .get(&user_id)
            .ok_or(TicketingError::UserNotFound(user_id))
    }

    fn event(&self, event_id: EventId) -> Result<&Event, TicketingError> {
        self.events
            .get(&event_id)
            .ok_or(TicketingError::EventNotFound(event_id))
    }

    fn sold(&self, event_id: EventId) -> u64 {
        self.tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .map(|t| u64::from(t.quantity))
            .sum()
    }
}

/// Store keeping every table in process memory.
///
/// A single [`RwLock`] guards all tables, so each operation (including the
/// capacity check of [`TicketingStore::create_ticket`] and the cascades) is
/// atomic with respect to every other.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketingStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), TicketingError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, TicketingError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(TicketingError::Conflict(format!(
                "username {} is taken",
                user.username
            )));
        }
        let id = UserId::new(tables.next_id());
        let user = User {
            id,
            username: user.username,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, TicketingError> {
        self.tables.read().await.user(user_id).cloned()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), TicketingError> {
        let mut tables = self.tables.write().await;
        tables
            .users
            .remove(&user_id)
            .ok_or(TicketingError::UserNotFound(user_id))?;
        tables.tickets.retain(|_, t| t.buyer_id != user_id);
        tables.admins.retain(|_, a| a.user_id != user_id);
        Ok(())
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event, TicketingError> {
        event.validate()?;
        let mut tables = self.tables.write().await;
        let id = EventId::new(tables.next_id());
        let now = Utc::now();
        let event = Event {
            id,
            title: event.title,
            description: event.description,
            location: event.location,
            start_datetime: event.start_datetime,
            end_datetime: event.end_datetime,
            capacity: event.capacity,
            price: event.price,
            created_at: now,
            updated_at: now,
        };
        tables.events.insert(id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: EventId) -> Result<Event, TicketingError> {
        self.tables.read().await.event(event_id).cloned()
    }

    async fn list_events(&self, offset: u64, limit: u64) -> Result<EventPage, TicketingError> {
        let tables = self.tables.read().await;
        let mut events: Vec<&Event> = tables.events.values().collect();
        events.sort_by_key(|e| (e.start_datetime, e.id));
        let total = events.len() as u64;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(EventPage {
            events: events.into_iter().skip(skip).take(take).cloned().collect(),
            total,
        })
    }

    async fn update_event(
        &self,
        event_id: EventId,
        event: NewEvent,
    ) -> Result<Event, TicketingError> {
        event.validate()?;
        let mut tables = self.tables.write().await;
        let stored = tables
            .events
            .get_mut(&event_id)
            .ok_or(TicketingError::EventNotFound(event_id))?;
        stored.title = event.title;
        stored.description = event.description;
        stored.location = event.location;
        stored.start_datetime = event.start_datetime;
        stored.end_datetime = event.end_datetime;
        stored.capacity = event.capacity;
        stored.price = event.price;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_event(&self, event_id: EventId) -> Result<(), TicketingError> {
        let mut tables = self.tables.write().await;
        tables
            .events
            .remove(&event_id)
            .ok_or(TicketingError::EventNotFound(event_id))?;
        tables.tickets.retain(|_, t| t.event_id != event_id);
        tables.admins.retain(|_, a| a.event_id != event_id);
        Ok(())
    }

    async fn tickets_sold(&self, event_id: EventId) -> Result<u64, TicketingError> {
        let tables = self.tables.read().await;
        tables.event(event_id)?;
        Ok(tables.sold(event_id))
    }

    async fn assign_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<EventAdmin, TicketingError> {
        let mut tables = self.tables.write().await;
        tables.user(user_id)?;
        tables.event(event_id)?;
        if tables
            .admins
            .values()
            .any(|a| a.user_id == user_id && a.event_id == event_id)
        {
            return Err(TicketingError::DuplicateAdmin { user_id, event_id });
        }
        let id = EventAdminId::new(tables.next_id());
        let admin = EventAdmin {
            id,
            user_id,
            event_id,
            assigned_at: Utc::now(),
        };
        tables.admins.insert(id, admin.clone());
        Ok(admin)
    }

    async fn list_admins(&self, event_id: EventId) -> Result<Vec<EventAdmin>, TicketingError> {
        let tables = self.tables.read().await;
        tables.event(event_id)?;
        let mut admins: Vec<EventAdmin> = tables
            .admins
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        admins.sort_by_key(|a| (a.assigned_at, a.id));
        Ok(admins)
    }

    async fn list_admin_events(
        &self,
        user_id: UserId,
    ) -> Result<Vec<EventAdmin>, TicketingError> {
        let tables = self.tables.read().await;
        tables.user(user_id)?;
        let mut admins: Vec<EventAdmin> = tables
            .admins
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        admins.sort_by_key(|a| (a.assigned_at, a.id));
        Ok(admins)
    }

    async fn revoke_admin(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), TicketingError> {
        let mut tables = self.tables.write().await;
        let before = tables.admins.len();
        tables
            .admins
            .retain(|_, a| !(a.user_id == user_id && a.event_id == event_id));
        if tables.admins.len() == before {
            return Err(TicketingError::AdminNotFound { user_id, event_id });
        }
        Ok(())
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, TicketingError> {
        ticket.validate()?;
        let mut tables = self.tables.write().await;
        tables.user(ticket.buyer_id)?;
        let event = tables.event(ticket.event_id)?;
        if let Some(available) = event.seats_available(tables.sold(ticket.event_id))
            && u64::from(ticket.quantity) > available
        {
            return Err(TicketingError::InsufficientCapacity {
                requested: ticket.quantity,
                available,
            });
        }
        let id = TicketId::new(tables.next_id());
        let ticket = Ticket {
            id,
            event_id: ticket.event_id,
            buyer_id: ticket.buyer_id,
            quantity: ticket.quantity,
            total: ticket.total,
            status: TicketStatus::Pending,
            purchased_at: Utc::now(),
        };
        tables.tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, TicketingError> {
        self.tables
            .read()
            .await
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or(TicketingError::TicketNotFound(ticket_id))
    }

    async fn list_tickets_by_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        let tables = self.tables.read().await;
        tables.event(event_id)?;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_tickets_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> Result<Vec<Ticket>, TicketingError> {
        let tables = self.tables.read().await;
        tables.user(buyer_id)?;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, TicketingError> {
        let mut tables = self.tables.write().await;
        let ticket = tables
            .tickets
            .get_mut(&ticket_id)
            .ok_or(TicketingError::TicketNotFound(ticket_id))?;
        ticket.status = ticket.status.transition(status)?;
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<(), TicketingError> {
        self.tables
            .write()
            .await
            .tickets
            .remove(&ticket_id)
            .map(|_| ())
            .ok_or(TicketingError::TicketNotFound(ticket_id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    async fn seed(store: &InMemoryStore, capacity: Option<u32>) -> (User, Event) {
        let Ok(user) = store.create_user(NewUser::new("marta")).await else {
            panic!("user creation failed");
        };
        let mut draft = NewEvent::new("Harbour 10k", Utc::now());
        draft.capacity = capacity;
        let Ok(event) = store.create_event(draft).await else {
            panic!("event creation failed");
        };
        (user, event)
    }

    fn ticket(event: &Event, buyer: &User, quantity: u32) -> NewTicket {
        NewTicket {
            event_id: event.id,
            buyer_id: buyer.id,
            quantity,
            total: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn tickets_sold_sums_quantities() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, Some(10)).await;
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(0));

        let _ = store.create_ticket(ticket(&event, &user, 3)).await;
        let _ = store.create_ticket(ticket(&event, &user, 4)).await;
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(7));
    }

    #[tokio::test]
    async fn tickets_sold_counts_cancelled() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;
        let Ok(t) = store.create_ticket(ticket(&event, &user, 2)).await else {
            panic!("ticket creation failed");
        };
        let _ = store
            .update_ticket_status(t.id, TicketStatus::Cancelled)
            .await;
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(2));
    }

    #[tokio::test]
    async fn create_ticket_rejects_overselling() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, Some(5)).await;
        assert!(store.create_ticket(ticket(&event, &user, 4)).await.is_ok());

        let result = store.create_ticket(ticket(&event, &user, 2)).await;
        let Err(TicketingError::InsufficientCapacity {
            requested,
            available,
        }) = result
        else {
            panic!("expected InsufficientCapacity");
        };
        assert_eq!((requested, available), (2, 1));
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(4));
    }

    #[tokio::test]
    async fn create_ticket_rejects_dangling_references() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;

        let mut draft = ticket(&event, &user, 1);
        draft.buyer_id = UserId::new(999);
        assert!(matches!(
            store.create_ticket(draft).await,
            Err(TicketingError::UserNotFound(_))
        ));

        let mut draft = ticket(&event, &user, 1);
        draft.event_id = EventId::new(999);
        assert!(matches!(
            store.create_ticket(draft).await,
            Err(TicketingError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_admin_is_rejected() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;

        assert!(store.assign_admin(user.id, event.id).await.is_ok());
        assert!(matches!(
            store.assign_admin(user.id, event.id).await,
            Err(TicketingError::DuplicateAdmin { .. })
        ));
        assert_eq!(store.list_admins(event.id).await.map(|a| a.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn revoke_missing_admin_is_not_found() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;
        assert!(matches!(
            store.revoke_admin(user.id, event.id).await,
            Err(TicketingError::AdminNotFound { .. })
        ));

        let _ = store.assign_admin(user.id, event.id).await;
        assert!(store.revoke_admin(user.id, event.id).await.is_ok());
        assert_eq!(store.list_admins(event.id).await.map(|a| a.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn delete_event_cascades() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;
        let Ok(t) = store.create_ticket(ticket(&event, &user, 1)).await else {
            panic!("ticket creation failed");
        };
        let _ = store.assign_admin(user.id, event.id).await;

        assert!(store.delete_event(event.id).await.is_ok());

        assert!(matches!(
            store.get_ticket(t.id).await,
            Err(TicketingError::TicketNotFound(_))
        ));
        assert_eq!(
            store.list_admin_events(user.id).await.map(|a| a.len()).ok(),
            Some(0)
        );
        assert_eq!(
            store.list_tickets_by_buyer(user.id).await.map(|t| t.len()).ok(),
            Some(0)
        );
        assert!(store.get_user(user.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_user_cascades() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, Some(10)).await;
        let _ = store.create_ticket(ticket(&event, &user, 3)).await;
        let _ = store.assign_admin(user.id, event.id).await;

        assert!(store.delete_user(user.id).await.is_ok());

        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(0));
        assert_eq!(store.list_admins(event.id).await.map(|a| a.len()).ok(), Some(0));
        assert!(store.get_event(event.id).await.is_ok());
    }

    #[tokio::test]
    async fn update_event_bumps_updated_at() {
        let store = InMemoryStore::new();
        let (_, event) = seed(&store, None).await;

        let mut draft = NewEvent::new("Harbour 10k (rescheduled)", event.start_datetime);
        draft.capacity = Some(50);
        let Ok(updated) = store.update_event(event.id, draft).await else {
            panic!("update failed");
        };
        assert_eq!(updated.title, "Harbour 10k (rescheduled)");
        assert_eq!(updated.capacity, Some(50));
        assert_eq!(updated.created_at, event.created_at);
        assert!(updated.updated_at >= event.updated_at);
    }

    #[tokio::test]
    async fn status_update_follows_lifecycle() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;
        let Ok(t) = store.create_ticket(ticket(&event, &user, 1)).await else {
            panic!("ticket creation failed");
        };
        assert_eq!(t.status, TicketStatus::Pending);

        let Ok(paid) = store.update_ticket_status(t.id, TicketStatus::Paid).await else {
            panic!("PENDING -> PAID must succeed");
        };
        assert_eq!(paid.status, TicketStatus::Paid);

        assert!(matches!(
            store.update_ticket_status(t.id, TicketStatus::Pending).await,
            Err(TicketingError::InvalidStatusTransition { .. })
        ));
        assert_eq!(
            store.get_ticket(t.id).await.map(|t| t.status).ok(),
            Some(TicketStatus::Paid)
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let store = InMemoryStore::new();
        let _ = store.create_user(NewUser::new("marta")).await;
        assert!(matches!(
            store.create_user(NewUser::new("marta")).await,
            Err(TicketingError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn list_events_orders_by_start() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let _ = store
            .create_event(NewEvent::new("later", now + chrono::Duration::days(2)))
            .await;
        let _ = store.create_event(NewEvent::new("sooner", now)).await;

        let Ok(page) = store.list_events(0, 10).await else {
            panic!("list failed");
        };
        let titles: Vec<&str> = page.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["sooner", "later"]);
        assert_eq!(page.total, 2);

        let Ok(second) = store.list_events(1, 1).await else {
            panic!("list failed");
        };
        assert_eq!(second.events.len(), 1);
        assert!(second.events.iter().all(|e| e.title == "later"));
        assert_eq!(second.total, 2);

        let Ok(past_end) = store.list_events(5, 10).await else {
            panic!("list failed");
        };
        assert!(past_end.events.is_empty());
        assert_eq!(past_end.total, 2);
    }

    #[tokio::test]
    async fn delete_ticket_frees_seats() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, Some(4)).await;
        let mut ids = Vec::new();
        for quantity in [1, 3] {
            let Ok(t) = store.create_ticket(ticket(&event, &user, quantity)).await else {
                panic!("ticket creation failed");
            };
            ids.push(t.id);
        }
        let listed: Option<Vec<TicketId>> = store
            .list_tickets_by_event(event.id)
            .await
            .ok()
            .map(|tickets| tickets.iter().map(|t| t.id).collect());
        assert_eq!(listed.as_ref(), Some(&ids));

        let Some(&first) = ids.first() else {
            panic!("no tickets");
        };
        assert!(store.delete_ticket(first).await.is_ok());
        assert!(matches!(
            store.delete_ticket(first).await,
            Err(TicketingError::TicketNotFound(_))
        ));
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(3));
    }

    #[tokio::test]
    async fn admin_roles_are_listed_per_user() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;
        let _ = store.assign_admin(user.id, event.id).await;

        let Ok(roles) = store.list_admin_events(user.id).await else {
            panic!("listing failed");
        };
        assert_eq!(roles.len(), 1);
        assert!(roles.iter().all(|r| r.event_id == event.id));
        assert!(matches!(
            store.list_admin_events(UserId::new(999)).await,
            Err(TicketingError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn values_beyond_integer_columns_are_rejected() {
        let store = InMemoryStore::new();
        let (user, event) = seed(&store, None).await;

        let mut draft = NewEvent::new("Stadium", Utc::now());
        draft.capacity = Some(3_000_000_000);
        assert!(matches!(
            store.create_event(draft).await,
            Err(TicketingError::InvalidRequest(_))
        ));

        assert!(matches!(
            store.create_ticket(ticket(&event, &user, 3_000_000_000)).await,
            Err(TicketingError::InvalidRequest(_))
        ));
        assert_eq!(store.tickets_sold(event.id).await.ok(), Some(0));
    }
}
