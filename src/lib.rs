//! # event-ticketing
//!
//! REST service for events, their administrators, and ticket sales.
//!
//! Events carry an optional seat capacity and a price. Tickets record a
//! purchase of some quantity of seats against an event and move through a
//! small status lifecycle (`PENDING → PAID → CANCELLED`). Event admins grant
//! a user management rights over one event.
//!
//! Capacity is enforced when a ticket is created: the check and the insert
//! happen in one transaction, so concurrent purchases cannot oversell.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TicketingService (service/)
//!     │
//!     ├── TicketingStore (persistence/)
//!     │     ├── PostgresStore
//!     │     └── InMemoryStore
//!     │
//!     └── Records, ids, status lifecycle (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
