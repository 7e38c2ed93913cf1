//! Event DTOs for create, update, get, list and availability.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{PaginationMeta, parse_decimal};
use crate::domain::{Event, NewEvent};
use crate::error::TicketingError;
use crate::service::EventOverview;

/// Request body for `POST /events` and `PUT /events/:id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EventRequest {
    /// Short title (max 200 chars).
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Venue (max 200 chars).
    #[serde(default)]
    pub location: Option<String>,
    /// Start time (ISO-8601).
    pub start_datetime: DateTime<Utc>,
    /// End time (ISO-8601), not before `start_datetime`.
    #[serde(default)]
    pub end_datetime: Option<DateTime<Utc>>,
    /// Maximum seats; omit or `null` for unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Seat price as a decimal string. Defaults to `"0"`.
    #[serde(default)]
    pub price: Option<String>,
}

impl EventRequest {
    /// Converts the request into domain field values.
    ///
    /// Blank description and location are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] if `price` is not a
    /// decimal number.
    pub fn into_new_event(self) -> Result<NewEvent, TicketingError> {
        let price = match self.price.as_deref() {
            Some(raw) => parse_decimal(raw, "price")?,
            None => Decimal::ZERO,
        };
        Ok(NewEvent {
            title: self.title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            location: self.location.filter(|l| !l.trim().is_empty()),
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
            capacity: self.capacity,
            price,
        })
    }
}

/// An event as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// Event identifier.
    pub event_id: i64,
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
    /// Maximum seats; `null` is unlimited.
    pub capacity: Option<u32>,
    /// Seat price (string-encoded decimal).
    pub price: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Canonical API path.
    pub url: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let url = event.absolute_url();
        Self {
            event_id: event.id.get(),
            title: event.title,
            description: event.description,
            location: event.location,
            start_datetime: event.start_datetime,
            end_datetime: event.end_datetime,
            capacity: event.capacity,
            price: event.price.to_string(),
            created_at: event.created_at,
            updated_at: event.updated_at,
            url,
        }
    }
}

/// Event detail for `GET /events/:id`, including seat aggregates.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    /// The event fields.
    #[serde(flatten)]
    pub event: EventResponse,
    /// Seats sold across all tickets.
    pub tickets_sold: u64,
    /// Seats left; `null` when unlimited.
    pub seats_available: Option<u64>,
}

impl From<EventOverview> for EventDetailResponse {
    fn from(overview: EventOverview) -> Self {
        Self {
            event: overview.event.into(),
            tickets_sold: overview.tickets_sold,
            seats_available: overview.seats_available,
        }
    }
}

/// Response body for `GET /events/:id/availability`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Event identifier.
    pub event_id: i64,
    /// Maximum seats; `null` is unlimited.
    pub capacity: Option<u32>,
    /// Seats sold across all tickets.
    pub tickets_sold: u64,
    /// Seats left; `null` when unlimited.
    pub seats_available: Option<u64>,
    /// `true` when the event has no capacity limit.
    pub unlimited: bool,
}

impl From<EventOverview> for AvailabilityResponse {
    fn from(overview: EventOverview) -> Self {
        Self {
            event_id: overview.event.id.get(),
            capacity: overview.event.capacity,
            tickets_sold: overview.tickets_sold,
            seats_available: overview.seats_available,
            unlimited: overview.seats_available.is_none(),
        }
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events on this page.
    pub data: Vec<EventResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn request(price: Option<&str>) -> EventRequest {
        EventRequest {
            title: "Harbour 10k".to_string(),
            description: Some("  ".to_string()),
            location: Some("Pier 4".to_string()),
            start_datetime: Utc::now(),
            end_datetime: None,
            capacity: Some(100),
            price: price.map(str::to_string),
        }
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let Ok(draft) = request(None).into_new_event() else {
            panic!("conversion failed");
        };
        assert_eq!(draft.price, Decimal::ZERO);
        assert_eq!(draft.description, None);
        assert_eq!(draft.location.as_deref(), Some("Pier 4"));
    }

    #[test]
    fn malformed_price_is_rejected() {
        assert!(request(Some("cheap")).into_new_event().is_err());
        let Ok(draft) = request(Some("19.99")).into_new_event() else {
            panic!("conversion failed");
        };
        assert_eq!(draft.price, Decimal::new(1999, 2));
    }
}
