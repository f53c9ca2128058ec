//! Session middleware configuration and session-backed state.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, and provides the
//! helpers that read and write the cart and flash notices.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use bookshop_core::Cart;

use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bookshop_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The `tower_sessions.session` table is created by the storefront migrations.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone());

    // Determine if we're in production (HTTPS)
    let is_secure = config.is_secure();

    session_layer(store, is_secure)
}

/// Wrap any session store with the storefront's cookie settings.
#[must_use]
pub fn session_layer<S: SessionStore>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

// =============================================================================
// Cart
// =============================================================================

/// Load the session cart, empty if none has been stored yet.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Replace the session cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Empty the session cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    save_cart(session, &Cart::new()).await
}

// =============================================================================
// Flash notices
// =============================================================================

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_notice(
    session: &Session,
    notice: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut notices = session
        .get::<Vec<String>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    notices.push(notice.into());
    session.insert(session_keys::NOTICES, notices).await
}

/// Queue several notices at once, in order.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_notices(
    session: &Session,
    new: impl IntoIterator<Item = String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut notices = session
        .get::<Vec<String>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    notices.extend(new);
    session.insert(session_keys::NOTICES, notices).await
}

/// Remove and return every queued notice.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_notices(
    session: &Session,
) -> Result<Vec<String>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<String>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use bookshop_core::BookId;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_cart_starts_empty() {
        let session = session();
        assert!(load_cart(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_roundtrips_through_session() {
        let session = session();
        let mut cart = load_cart(&session).await.unwrap();
        cart.add(BookId::new(3));
        cart.add(BookId::new(3));
        save_cart(&session, &cart).await.unwrap();

        let loaded = load_cart(&session).await.unwrap();
        assert_eq!(loaded.count_of(BookId::new(3)), 2);

        clear_cart(&session).await.unwrap();
        assert!(load_cart(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notices_drain_once() {
        let session = session();
        push_notice(&session, "first").await.unwrap();
        push_notices(&session, vec!["second".to_string(), "third".to_string()])
            .await
            .unwrap();

        assert_eq!(
            take_notices(&session).await.unwrap(),
            vec!["first", "second", "third"]
        );
        assert!(take_notices(&session).await.unwrap().is_empty());
    }
}
