//! Database row models for users, events, admins and tickets.
//!
//! Rows mirror the column types of `migrations/0001_init.sql`; the
//! `TryFrom` impls narrow them into the domain records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Event, EventAdmin, Ticket, TicketStatus, User};
use crate::error::TicketingError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// `BIGSERIAL` key.
    pub id: i64,
    /// Unique display name.
    pub username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            username: row.username,
        }
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// `BIGSERIAL` key.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// Start time.
    pub start_datetime: DateTime<Utc>,
    /// End time.
    pub end_datetime: Option<DateTime<Utc>>,
    /// `INTEGER` capacity, `NULL` when unlimited.
    pub capacity: Option<i32>,
    /// `NUMERIC(8,2)` price.
    pub price: Decimal,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = TicketingError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let capacity = row
            .capacity
            .map(u32::try_from)
            .transpose()
            .map_err(|_| {
                TicketingError::Internal(format!("event {} has a negative capacity", row.id))
            })?;
        Ok(Self {
            id: row.id.into(),
            title: row.title,
            description: row.description,
            location: row.location,
            start_datetime: row.start_datetime,
            end_datetime: row.end_datetime,
            capacity,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `event_admins` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventAdminRow {
    /// `BIGSERIAL` key.
    pub id: i64,
    /// Referenced user.
    pub user_id: i64,
    /// Referenced event.
    pub event_id: i64,
    /// Grant timestamp.
    pub assigned_at: DateTime<Utc>,
}

impl From<EventAdminRow> for EventAdmin {
    fn from(row: EventAdminRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            event_id: row.event_id.into(),
            assigned_at: row.assigned_at,
        }
    }
}

/// A row from the `tickets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketRow {
    /// `BIGSERIAL` key.
    pub id: i64,
    /// Referenced event.
    pub event_id: i64,
    /// Referenced buyer.
    pub buyer_id: i64,
    /// `INTEGER` quantity, at least one.
    pub quantity: i32,
    /// `NUMERIC(10,2)` total.
    pub total: Decimal,
    /// Status text (`PENDING`, `PAID`, `CANCELLED`).
    pub status: String,
    /// Insert timestamp.
    pub purchased_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = TicketingError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            TicketingError::Internal(format!("ticket {} has a negative quantity", row.id))
        })?;
        let status: TicketStatus = row.status.parse()?;
        Ok(Self {
            id: row.id.into(),
            event_id: row.event_id.into(),
            buyer_id: row.buyer_id.into(),
            quantity,
            total: row.total,
            status,
            purchased_at: row.purchased_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn event_row(capacity: Option<i32>) -> EventRow {
        let now = Utc::now();
        EventRow {
            id: 1,
            title: "Open day".to_string(),
            description: None,
            location: None,
            start_datetime: now,
            end_datetime: None,
            capacity,
            price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn event_row_keeps_null_capacity() {
        let Ok(event) = Event::try_from(event_row(None)) else {
            panic!("conversion failed");
        };
        assert_eq!(event.capacity, None);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        assert!(Event::try_from(event_row(Some(-1))).is_err());
    }

    #[test]
    fn ticket_row_parses_status() {
        let row = TicketRow {
            id: 3,
            event_id: 1,
            buyer_id: 2,
            quantity: 2,
            total: Decimal::new(3000, 2),
            status: "PAID".to_string(),
            purchased_at: Utc::now(),
        };
        let Ok(ticket) = Ticket::try_from(row.clone()) else {
            panic!("conversion failed");
        };
        assert_eq!(ticket.status, TicketStatus::Paid);
        assert_eq!(ticket.quantity, 2);

        let bad = TicketRow {
            status: "REFUNDED".to_string(),
            ..row
        };
        assert!(Ticket::try_from(bad).is_err());
    }
}
