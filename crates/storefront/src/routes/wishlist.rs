//! Wishlist route handlers.
//!
//! All wishlist routes need a logged-in user; anonymous visitors are sent to
//! the login page with a notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use bookshop_core::PriceOrder;

use crate::db::{BookRepository, WishlistRepository};
use crate::error::AppError;
use crate::middleware::{OptionalAuth, PageContext, push_notice, require_user};
use crate::models::Book;
use crate::routes::{BookIdPath, SortQuery};
use crate::state::AppState;

const LOGIN_NOTICE: &str = "Please log in to create a wishlist";

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub ctx: PageContext,
    pub books: Vec<Book>,
    pub ascending: bool,
}

/// Display the caller's wishlist ordered by price.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SortQuery>,
) -> Result<WishlistTemplate, AppError> {
    let user = require_user(&session, user, LOGIN_NOTICE).await?;
    let order = PriceOrder::from_wishlist_param(query.value());

    let books = WishlistRepository::new(state.pool())
        .list(user.id, order)
        .await?;

    Ok(WishlistTemplate {
        ctx: PageContext::load(&state, &session).await?,
        books,
        ascending: order == PriceOrder::Ascending,
    })
}

/// Add a book to the caller's wishlist.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    BookIdPath(book_id): BookIdPath,
) -> Result<Redirect, AppError> {
    let user = require_user(&session, user, LOGIN_NOTICE).await?;

    // Unknown books are a 404, not a foreign-key error.
    BookRepository::new(state.pool()).get(book_id).await?;

    let added = WishlistRepository::new(state.pool())
        .add(user.id, book_id)
        .await?;

    let notice = if added {
        "The item has been added to your wishlist"
    } else {
        "This item is already in your wishlist"
    };
    push_notice(&session, notice).await?;

    Ok(Redirect::to("/wishlist"))
}

/// Remove a book from the caller's wishlist.
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    BookIdPath(book_id): BookIdPath,
) -> Result<Redirect, AppError> {
    let user = require_user(&session, user, LOGIN_NOTICE).await?;

    let removed = WishlistRepository::new(state.pool())
        .remove(user.id, book_id)
        .await?;

    let notice = if removed {
        "The item has been removed from your wishlist"
    } else {
        "This item is not in your wishlist"
    };
    push_notice(&session, notice).await?;

    Ok(Redirect::to("/wishlist"))
}
