//! Ticket purchase records and their status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Event, EventId, TicketId, User, UserId};
use crate::error::TicketingError;

/// Largest total a ticket may carry (`NUMERIC(10,2)`).
/// Largest quantity the `INTEGER` column holds.
pub const QUANTITY_MAX: u32 = i32::MAX.unsigned_abs();

const TOTAL_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Payment state of a ticket.
///
/// Moves only forward:
///
/// ```text
/// PENDING ──► PAID ──► CANCELLED
///    │                    ▲
///    └────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Reserved, awaiting payment.
    #[default]
    Pending,
    /// Paid in full.
    Paid,
    /// Cancelled; terminal.
    Cancelled,
}

impl TicketStatus {
    /// Stored representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns `true` if a ticket may move from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Paid | Self::Cancelled) | (Self::Paid, Self::Cancelled)
        )
    }

    /// Validates a move from `self` to `to`, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidStatusTransition`] for any edge not
    /// in the lifecycle, including staying in the same status.
    pub fn transition(self, to: Self) -> Result<Self, TicketingError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TicketingError::InvalidStatusTransition { from: self, to })
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(TicketingError::InvalidStatus(other.to_string())),
        }
    }
}

/// A purchase of `quantity` seats of one event by one buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier.
    pub id: TicketId,
    /// Event the seats belong to.
    pub event_id: EventId,
    /// Purchasing user.
    pub buyer_id: UserId,
    /// Number of seats, at least one.
    pub quantity: u32,
    /// Amount charged for the whole purchase.
    pub total: Decimal,
    /// Payment state.
    pub status: TicketStatus,
    /// When the purchase was recorded.
    pub purchased_at: DateTime<Utc>,
}

impl Ticket {
    /// Human-readable description for admin screens and logs.
    #[must_use]
    pub fn label(&self, buyer: &User, event: &Event) -> String {
        format!("Ticket #{} | {} → {}", self.id, buyer.username, event.title)
    }
}

/// Field values for recording a [`Ticket`].
///
/// New tickets always start in [`TicketStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Event the seats belong to.
    pub event_id: EventId,
    /// Purchasing user.
    pub buyer_id: UserId,
    /// Number of seats.
    pub quantity: u32,
    /// Amount charged for the whole purchase.
    pub total: Decimal,
}

impl NewTicket {
    /// Checks quantity and total before the values reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] when the quantity is zero
    /// or above [`QUANTITY_MAX`], or the total is negative, has more than two decimal places, or does
    /// not fit `NUMERIC(10,2)`.
    pub fn validate(&self) -> Result<(), TicketingError> {
        if self.quantity == 0 {
            return Err(TicketingError::InvalidRequest(
                "quantity must be at least 1".to_string(),
            ));
        }
        if self.quantity > QUANTITY_MAX {
            return Err(TicketingError::InvalidRequest(format!(
                "quantity must not exceed {QUANTITY_MAX}"
            )));
        }
        if self.total < Decimal::ZERO {
            return Err(TicketingError::InvalidRequest(
                "total must not be negative".to_string(),
            ));
        }
        if self.total.normalize().scale() > 2 {
            return Err(TicketingError::InvalidRequest(
                "total must have at most two decimal places".to_string(),
            ));
        }
        if self.total >= TOTAL_LIMIT {
            return Err(TicketingError::InvalidRequest(format!(
                "total must be below {TOTAL_LIMIT}"
            )));
        }
        Ok(())
    }
}
