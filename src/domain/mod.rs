//! Domain layer: entity records, identifiers, and seat arithmetic.
//!
//! These are plain data structs with no storage behavior attached. Reads
//! and writes go through [`crate::persistence::TicketingStore`].

pub mod event;
pub mod event_admin;
pub mod ids;
pub mod ticket;
pub mod user;

pub use event::{Event, EventPage, NewEvent};
pub use event_admin::EventAdmin;
pub use ids::{EventAdminId, EventId, TicketId, UserId};
pub use ticket::{NewTicket, Ticket, TicketStatus};
pub use user::{NewUser, User};
