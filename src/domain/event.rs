//! Bookable events and their seat aggregates.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EventId;
use crate::error::TicketingError;

/// Maximum length of an event title.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of an event location.
pub const LOCATION_MAX_LEN: usize = 200;

/// Largest price an event may carry (`NUMERIC(8,2)`).
/// Largest capacity the `INTEGER` column holds.
pub const CAPACITY_MAX: u32 = i32::MAX.unsigned_abs();

const PRICE_LIMIT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A bookable occasion with optional capacity and a per-seat price.
///
/// `capacity == None` means the event is unlimited. Timestamps are
/// maintained by the store: `created_at` once, `updated_at` on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Short human-readable title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// When the event starts.
    pub start_datetime: DateTime<Utc>,
    /// When the event ends, if known.
    pub end_datetime: Option<DateTime<Utc>>,
    /// Maximum total ticket quantity; `None` is unlimited.
    pub capacity: Option<u32>,
    /// Price of a single seat.
    pub price: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Seats left once `sold` seats are taken.
    ///
    /// Returns `None` for an unlimited event regardless of `sold`, and
    /// never goes below zero when more seats were sold than the capacity
    /// allows.
    #[must_use]
    pub fn seats_available(&self, sold: u64) -> Option<u64> {
        self.capacity
            .map(|capacity| u64::from(capacity).saturating_sub(sold))
    }

    /// Canonical API path of this event.
    #[must_use]
    pub fn absolute_url(&self) -> String {
        format!("/api/v1/events/{}", self.id)
    }
}

/// One page of events plus the total number of events stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPage {
    /// Events on this page, ordered by start time then id.
    pub events: Vec<Event>,
    /// Number of events across all pages.
    pub total: u64,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Field values for creating or replacing an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Short human-readable title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// When the event starts.
    pub start_datetime: DateTime<Utc>,
    /// When the event ends, if known.
    pub end_datetime: Option<DateTime<Utc>>,
    /// Maximum total ticket quantity; `None` is unlimited.
    pub capacity: Option<u32>,
    /// Price of a single seat.
    pub price: Decimal,
}

impl NewEvent {
    /// Creates a free, unlimited event with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, start_datetime: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            start_datetime,
            end_datetime: None,
            capacity: None,
            price: Decimal::ZERO,
        }
    }

    /// Checks field constraints before the values reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] when the title is blank or
    /// too long, the location is too long, the event ends before it starts,
    /// the capacity exceeds [`CAPACITY_MAX`], or the price is negative, has more than two decimal places, or does
    /// not fit `NUMERIC(8,2)`.
    pub fn validate(&self) -> Result<(), TicketingError> {
        if self.title.trim().is_empty() {
            return Err(TicketingError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(TicketingError::InvalidRequest(format!(
                "title exceeds {TITLE_MAX_LEN} characters"
            )));
        }
        if let Some(location) = &self.location
            && location.chars().count() > LOCATION_MAX_LEN
        {
            return Err(TicketingError::InvalidRequest(format!(
                "location exceeds {LOCATION_MAX_LEN} characters"
            )));
        }
        if let Some(end) = self.end_datetime
            && end < self.start_datetime
        {
            return Err(TicketingError::InvalidRequest(
                "end_datetime must not precede start_datetime".to_string(),
            ));
        }
        if let Some(capacity) = self.capacity
            && capacity > CAPACITY_MAX
        {
            return Err(TicketingError::InvalidRequest(format!(
                "capacity must not exceed {CAPACITY_MAX}"
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(TicketingError::InvalidRequest(
                "price must not be negative".to_string(),
            ));
        }
        if self.price.normalize().scale() > 2 {
            return Err(TicketingError::InvalidRequest(
                "price must have at most two decimal places".to_string(),
            ));
        }
        if self.price >= PRICE_LIMIT {
            return Err(TicketingError::InvalidRequest(format!(
                "price must be below {PRICE_LIMIT}"
            )));
        }
        Ok(())
    }
}
