//! Service layer: business logic orchestration.
//!
//! [`TicketingService`] validates input, computes seat aggregates, and
//! delegates storage to a [`crate::persistence::TicketingStore`].

pub mod ticketing_service;

pub use ticketing_service::{AdminEntry, EventOverview, TicketingService};
