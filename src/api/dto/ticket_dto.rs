//! Ticket DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ticket;

/// Request body for `POST /events/:id/tickets`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseTicketRequest {
    /// Buying user.
    pub buyer_id: i64,
    /// Seats bought. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Amount paid as a decimal string; computed from the event price
    /// when omitted.
    #[serde(default)]
    pub total: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

/// Request body for `PATCH /tickets/:id/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTicketStatusRequest {
    /// Target status: `PENDING`, `PAID` or `CANCELLED`.
    pub status: String,
}

/// A ticket as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketResponse {
    /// Ticket identifier.
    pub ticket_id: i64,
    /// Event the seats belong to.
    pub event_id: i64,
    /// Buying user.
    pub buyer_id: i64,
    /// Seats bought.
    pub quantity: u32,
    /// Amount paid (string-encoded decimal).
    pub total: String,
    /// Lifecycle status.
    pub status: String,
    /// Purchase timestamp.
    pub purchased_at: DateTime<Utc>,
    /// Display label; only present on single-ticket responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TicketResponse {
    /// Attaches a display label.
    #[must_use]
    pub fn with_label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_id: ticket.id.get(),
            event_id: ticket.event_id.get(),
            buyer_id: ticket.buyer_id.get(),
            quantity: ticket.quantity,
            total: ticket.total.to_string(),
            status: ticket.status.as_str().to_string(),
            purchased_at: ticket.purchased_at,
            label: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let Ok(req) = serde_json::from_str::<PurchaseTicketRequest>(r#"{"buyer_id": 4}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.quantity, 1);
        assert!(req.total.is_none());
    }

    #[test]
    fn label_is_omitted_when_absent() {
        let ticket = Ticket {
            id: 9.into(),
            event_id: 1.into(),
            buyer_id: 2.into(),
            quantity: 3,
            total: rust_decimal::Decimal::new(4500, 2),
            status: crate::domain::TicketStatus::Pending,
            purchased_at: Utc::now(),
        };
        let Ok(json) = serde_json::to_value(TicketResponse::from(ticket)) else {
            panic!("serialization failed");
        };
        assert_eq!(json["total"], "45.00");
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("label").is_none());
    }
}
