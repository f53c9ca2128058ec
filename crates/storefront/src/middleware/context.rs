//! Per-request page context for full-page templates.
//!
//! Every page shows the logged-in user, any pending notices, the cart size
//! and (when logged in) the wishlist size. [`PageContext`] gathers them once
//! per request so templates never reach into the session themselves.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::db::WishlistRepository;
use crate::error::AppError;
use crate::middleware::auth::current_user;
use crate::middleware::session::{load_cart, take_notices};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Header data shared by every full-page template.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Logged-in user, if any.
    pub user: Option<CurrentUser>,
    /// Notices queued since the last rendered page.
    pub notices: Vec<String>,
    /// Copies in the cart.
    pub cart_quantity: usize,
    /// Books on the wishlist; `None` when logged out.
    pub wishlist_quantity: Option<i64>,
}

impl PageContext {
    /// Build the context for a page about to be rendered.
    ///
    /// Drains the session's pending notices, so call this only on the path
    /// that renders a template, not on one that redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the session or the wishlist count cannot be read.
    pub async fn load(state: &AppState, session: &Session) -> Result<Self, AppError> {
        let user = current_user(session).await;
        let notices = take_notices(session).await?;
        let cart_quantity = load_cart(session).await?.len();

        let wishlist_quantity = match &user {
            Some(u) => Some(WishlistRepository::new(state.pool()).count(u.id).await?),
            None => None,
        };

        Ok(Self {
            user,
            notices,
            cart_quantity,
            wishlist_quantity,
        })
    }

    /// Username of the logged-in user, for templates.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;

        Self::load(state, &session).await
    }
}
