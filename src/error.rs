//! Ticketing error types with HTTP status code mapping.
//!
//! [`TicketingError`] is shared by the domain, store, service and API
//! layers. Each variant maps to a specific HTTP status code and structured
//! JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, TicketId, TicketStatus, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "insufficient capacity: requested 3, available 1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error enum shared by every layer, with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                  |
/// |-----------|-------------------|------------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request              |
/// | 2000–2099 | Not Found         | 404 Not Found                |
/// | 2100–2199 | Uniqueness        | 409 Conflict                 |
/// | 3000–3999 | Server            | 500 Internal Server Error    |
/// | 4000–4999 | Ticketing rules   | 409 Conflict / 422 Unprocessable Entity |
#[derive(Debug, thiserror::Error)]
pub enum TicketingError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown ticket status string.
    #[error("invalid ticket status: {0}")]
    InvalidStatus(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Ticket with the given ID was not found.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// The user does not administer the event.
    #[error("user {user_id} is not an admin of event {event_id}")]
    AdminNotFound {
        /// User that was looked up.
        user_id: UserId,
        /// Event that was looked up.
        event_id: EventId,
    },

    /// The user already administers the event.
    #[error("user {user_id} is already an admin of event {event_id}")]
    DuplicateAdmin {
        /// User that was granted twice.
        user_id: UserId,
        /// Event that was targeted twice.
        event_id: EventId,
    },

    /// A uniqueness constraint other than the admin pair was violated, or a
    /// foreign key no longer resolves because a parent row was deleted
    /// concurrently.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The ticket status change is not part of the lifecycle.
    #[error("cannot move ticket from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: TicketStatus,
        /// Requested status.
        to: TicketStatus,
    },

    /// Not enough seats left for the requested quantity.
    #[error("insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity {
        /// Seats asked for.
        requested: u32,
        /// Seats still free.
        available: u64,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidStatus(_) => 1002,
            Self::EventNotFound(_) => 2001,
            Self::UserNotFound(_) => 2002,
            Self::TicketNotFound(_) => 2003,
            Self::AdminNotFound { .. } => 2004,
            Self::DuplicateAdmin { .. } => 2101,
            Self::Conflict(_) => 2102,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::InvalidStatusTransition { .. } => 4001,
            Self::InsufficientCapacity { .. } => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_)
            | Self::UserNotFound(_)
            | Self::TicketNotFound(_)
            | Self::AdminNotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateAdmin { .. }
            | Self::Conflict(_)
            | Self::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            Self::InsufficientCapacity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for TicketingError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
        {
            return Self::Conflict(db_err.message().to_string());
        }
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for TicketingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        let errors = [
            TicketingError::EventNotFound(EventId::new(1)),
            TicketingError::UserNotFound(UserId::new(1)),
            TicketingError::TicketNotFound(TicketId::new(1)),
            TicketingError::AdminNotFound {
                user_id: UserId::new(1),
                event_id: EventId::new(1),
            },
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn duplicate_admin_is_conflict() {
        let err = TicketingError::DuplicateAdmin {
            user_id: UserId::new(4),
            event_id: EventId::new(2),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2101);
        assert_eq!(err.to_string(), "user 4 is already an admin of event 2");
    }

    #[test]
    fn capacity_error_message() {
        let err = TicketingError::InsufficientCapacity {
            requested: 3,
            available: 1,
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "insufficient capacity: requested 3, available 1"
        );
    }

    #[test]
    fn into_response_sets_status() {
        let response = TicketingError::InvalidStatus("SHIPPED".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[derive(Debug)]
    struct FakeDbError(sqlx::error::ErrorKind);

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("constraint violated")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                sqlx::error::ErrorKind::UniqueViolation => sqlx::error::ErrorKind::UniqueViolation,
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    sqlx::error::ErrorKind::ForeignKeyViolation
                }
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: sqlx::error::ErrorKind) -> TicketingError {
        TicketingError::from(sqlx::Error::Database(Box::new(FakeDbError(kind))))
    }

    #[test]
    fn constraint_violations_map_to_conflict() {
        assert!(matches!(
            db_error(sqlx::error::ErrorKind::UniqueViolation),
            TicketingError::Conflict(_)
        ));
        assert!(matches!(
            db_error(sqlx::error::ErrorKind::ForeignKeyViolation),
            TicketingError::Conflict(_)
        ));
        assert!(matches!(
            db_error(sqlx::error::ErrorKind::CheckViolation),
            TicketingError::PersistenceError(_)
        ));
        assert!(matches!(
            TicketingError::from(sqlx::Error::RowNotFound),
            TicketingError::PersistenceError(_)
        ));
    }
}
