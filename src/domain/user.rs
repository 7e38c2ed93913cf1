//! Users as seen from the ticketing side.
//!
//! Accounts belong to the authentication subsystem. This crate keeps only
//! the identifier and display name needed for foreign keys and labels.

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::error::TicketingError;

/// Maximum length of a username.
pub const USERNAME_MAX_LEN: usize = 150;

/// A user account referenced by admins and tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Unique display name.
    pub username: String,
}

/// Field values for registering a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique display name.
    pub username: String,
}

impl NewUser {
    /// Creates a new user draft.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Checks that the username is non-blank and fits the column.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::InvalidRequest`] otherwise.
    pub fn validate(&self) -> Result<(), TicketingError> {
        if self.username.trim().is_empty() {
            return Err(TicketingError::InvalidRequest(
                "username must not be empty".to_string(),
            ));
        }
        if self.username.chars().count() > USERNAME_MAX_LEN {
            return Err(TicketingError::InvalidRequest(format!(
                "username exceeds {USERNAME_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}
