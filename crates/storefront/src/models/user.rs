//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use bookshop_core::{Email, UserId, Username};

use super::CurrentUser;

/// A storefront account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Public display name.
    pub username: Username,
    /// User's email address.
    pub email: Email,
    /// Whether the account has admin rights.
    pub is_admin: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
