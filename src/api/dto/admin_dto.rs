//! Event admin DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::EventAdmin;
use crate::service::AdminEntry;

/// Request body for `POST /events/:id/admins`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignAdminRequest {
    /// User to grant admin rights to.
    pub user_id: i64,
}

/// An admin grant as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    /// Grant identifier.
    pub admin_id: i64,
    /// Admin user.
    pub user_id: i64,
    /// Administered event.
    pub event_id: i64,
    /// Admin's username.
    pub username: String,
    /// Display label.
    pub label: String,
    /// Grant timestamp.
    pub assigned_at: DateTime<Utc>,
}

impl From<AdminEntry> for AdminResponse {
    fn from(entry: AdminEntry) -> Self {
        Self {
            admin_id: entry.admin.id.get(),
            user_id: entry.admin.user_id.get(),
            event_id: entry.admin.event_id.get(),
            username: entry.username,
            label: entry.label,
            assigned_at: entry.admin.assigned_at,
        }
    }
}

/// An admin role held by a user, as listed by `GET /users/:id/admin-events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminRoleResponse {
    /// Grant identifier.
    pub admin_id: i64,
    /// Administered event.
    pub event_id: i64,
    /// Grant timestamp.
    pub assigned_at: DateTime<Utc>,
}

impl From<EventAdmin> for AdminRoleResponse {
    fn from(admin: EventAdmin) -> Self {
        Self {
            admin_id: admin.id.get(),
            event_id: admin.event_id.get(),
            assigned_at: admin.assigned_at,
        }
    }
}
