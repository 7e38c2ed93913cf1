//! User DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Unique display name.
    pub username: String,
}

/// A user as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// User identifier.
    pub user_id: i64,
    /// Display name.
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.get(),
            username: user.username,
        }
    }
}
