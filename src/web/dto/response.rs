//! Response DTOs for the Web API.
//!
//! Boards, posts, comments and public profiles are serialized directly from
//! their models; the types here cover the account-specific shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{PublicUser, Role, User};

/// Full user record, shown to the account owner and to admins.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub reputation: i64,
    pub avatar_url: String,
    pub role: Role,
    pub active: bool,
    pub create_date: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            reputation: user.reputation,
            avatar_url: user.avatar_url.clone(),
            role: user.role,
            active: user.is_active,
            create_date: user.created_at,
        }
    }
}

/// A user as seen by a particular requester: the full record or the public
/// projection, depending on the policy decision.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Full(UserResponse),
    Public(PublicUser),
}

impl UserView {
    /// Project `user` fully when `private` is set, publicly otherwise.
    pub fn of(user: &User, private: bool) -> Self {
        if private {
            UserView::Full(UserResponse::from(user))
        } else {
            UserView::Public(user.to_public())
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
    /// Access token (JWT).
    pub token: String,
    /// The account itself.
    pub user: UserResponse,
}

/// Role of the requester.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}
