//! Type-safe record identifiers.
//!
//! Every table uses a store-assigned `BIGSERIAL` key. Each entity gets its
//! own newtype over `i64` so that an [`EventId`] can never be passed where a
//! [`TicketId`] is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw key as returned by the store.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// Identifier of an [`super::Event`].
    EventId
);
record_id!(
    /// Identifier of an [`super::EventAdmin`] row.
    EventAdminId
);
record_id!(
    /// Identifier of a [`super::Ticket`].
    TicketId
);
record_id!(
    /// Identifier of a [`super::User`] owned by the authentication subsystem.
    UserId
);
