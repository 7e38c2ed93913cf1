//! Grants of administrative rights over an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Event, EventAdminId, EventId, User, UserId};

/// Associates one user with one event they may manage.
///
/// The pair `(user_id, event_id)` is unique. The row disappears when either
/// side is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAdmin {
    /// Store-assigned identifier.
    pub id: EventAdminId,
    /// The user holding the role.
    pub user_id: UserId,
    /// The event being administered.
    pub event_id: EventId,
    /// When the role was granted.
    pub assigned_at: DateTime<Utc>,
}

impl EventAdmin {
    /// Human-readable description for admin screens and logs.
    #[must_use]
    pub fn label(&self, user: &User, event: &Event) -> String {
        format!("{} — admin of {}", user.username, event.title)
    }
}
