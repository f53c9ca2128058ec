//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Catalog (?sort=1 ascending, other descending)
//!
//! # Books
//! GET  /viewinfo?id=&sort=            - Book detail with reviews
//! POST /viewinfo?id=&sort=            - Post a review (requires auth)
//! GET  /delete_review/{book_id}       - Delete own review (requires auth)
//!
//! # Wishlist (requires auth)
//! GET  /wishlist?sort=                - Wishlist (?sort=0 descending, other ascending)
//! GET  /add_to_wishlist/{book_id}     - Add a book
//! GET  /remove_from_wishlist/{book_id} - Remove a book
//!
//! # Cart
//! GET  /cart                          - Cart page
//! POST /cart                          - Cart page
//! GET  /add_to_cart/{book_id}         - Add one copy
//! GET  /remove_from_cart/{book_id}    - Remove one copy
//! POST /remove_from_cart/{book_id}    - Remove one copy
//! GET  /empty_cart                    - Clear the cart
//! GET  /checkout                      - Checkout form
//! POST /checkout                      - Place the order
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Login action (rate limited)
//! GET  /register                      - Register page
//! POST /register                      - Register action (rate limited)
//! GET  /logout                        - Logout action
//!
//! # Account (requires auth)
//! GET  /user                          - Purchases and reviews
//! ```
//!
//! A `{book_id}` segment that is not an integer gets the not-found page.

pub mod account;
pub mod auth;
pub mod books;
pub mod cart;
pub mod home;
pub mod wishlist;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use bookshop_core::BookId;

use crate::error::AppError;
use crate::middleware::{PageContext, auth_rate_limiter};
use crate::state::AppState;

// =============================================================================
// Shared Types
// =============================================================================

/// `?sort=` query parameter.
///
/// Parsed leniently: a value that is not an integer counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

impl SortQuery {
    /// The selector as an integer, if present and numeric.
    #[must_use]
    pub fn value(&self) -> Option<i32> {
        parse_int(self.sort.as_deref())
    }
}

fn parse_int(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// `{book_id}` path segment.
///
/// Rejects with the not-found page instead of axum's plain-text 400 when the
/// segment is not an `i32`.
pub struct BookIdPath(pub BookId);

impl<S> FromRequestParts<S> for BookIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;

        raw.parse::<i32>()
            .map(|id| Self(BookId::new(id)))
            .map_err(|_| AppError::NotFound(format!("book {raw}")))
    }
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

/// Fallback handler for unknown paths.
pub async fn not_found(ctx: PageContext) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { ctx })
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
///
/// Only the form submissions sit behind the rate limiter.
pub fn auth_routes() -> Router<AppState> {
    let submissions = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/logout", get(auth::logout))
        .merge(submissions)
}

/// Create the book detail and review routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/viewinfo", get(books::show).post(books::create_review))
        .route("/delete_review/{book_id}", get(books::delete_review))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show))
        .route("/add_to_wishlist/{book_id}", get(wishlist::add))
        .route("/remove_from_wishlist/{book_id}", get(wishlist::remove))
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::show))
        .route("/add_to_cart/{book_id}", get(cart::add))
        .route(
            "/remove_from_cart/{book_id}",
            get(cart::remove).post(cart::remove),
        )
        .route("/empty_cart", get(cart::empty))
        .route("/checkout", get(cart::checkout_page).post(cart::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/user", get(account::user))
        .merge(auth_routes())
        .merge(book_routes())
        .merge(wishlist_routes())
        .merge(cart_routes())
        .fallback(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_query_is_lenient() {
        let q = |s: Option<&str>| SortQuery {
            sort: s.map(str::to_string),
        };
        assert_eq!(q(Some("2")).value(), Some(2));
        assert_eq!(q(Some(" 0 ")).value(), Some(0));
        assert_eq!(q(Some("cheap")).value(), None);
        assert_eq!(q(None).value(), None);
    }
}
