//! Session-related types.
//!
//! Types stored in the session for authentication, the cart and flash notices.

use serde::{Deserialize, Serialize};

use bookshop_core::{Email, UserId, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name.
    pub username: Username,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart: a JSON array of book ids, one entry per copy.
    pub const CART: &str = "cart";

    /// Key for flash notices waiting for the next rendered page.
    pub const NOTICES: &str = "notices";
}
