//! Data Transfer Objects for REST request/response serialization.
//!
//! Money is serialized as JSON strings (`"12.50"`) so that decimal values
//! never pass through a float. Ids are the raw store keys.

pub mod admin_dto;
pub mod common_dto;
pub mod event_dto;
pub mod ticket_dto;
pub mod user_dto;

pub use admin_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use ticket_dto::*;
pub use user_dto::*;
