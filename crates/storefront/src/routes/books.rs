//! Book detail and review route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bookshop_core::{BookId, ReviewOrder};

use crate::db::{BookRepository, RepositoryError, ReviewRepository};
use crate::error::AppError;
use crate::forms::{FieldErrors, ReviewForm};
use crate::middleware::{OptionalAuth, PageContext, push_notice, require_user};
use crate::models::{Book, BookReview, CurrentUser};
use crate::routes::{BookIdPath, parse_int};
use crate::state::AppState;

const ALREADY_REVIEWED: &str = "You have already reviewed this book";

/// `/viewinfo` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ViewInfoQuery {
    pub id: Option<String>,
    pub sort: Option<String>,
}

impl ViewInfoQuery {
    /// Book id; a missing or malformed id is `0`, which never exists.
    fn book_id(&self) -> BookId {
        BookId::new(parse_int(self.id.as_deref()).unwrap_or(0))
    }

    fn order(&self) -> ReviewOrder {
        ReviewOrder::from_param(parse_int(self.sort.as_deref()))
    }
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "viewinfo.html")]
pub struct ViewInfoTemplate {
    pub ctx: PageContext,
    pub book: Book,
    pub reviews: Vec<BookReview>,
    pub sort: i32,
    /// Show the review form (logged in and not yet reviewed).
    pub can_review: bool,
    /// Show the delete link (logged in and already reviewed).
    pub has_reviewed: bool,
    pub form: ReviewForm,
    pub errors: FieldErrors,
}

fn book_url(book_id: BookId, order: ReviewOrder) -> String {
    format!(
        "/viewinfo?id={book_id}&sort={}#viewitem-reviews-base",
        order.as_param()
    )
}

async fn render(
    state: &AppState,
    session: &Session,
    book: Book,
    user: Option<&CurrentUser>,
    order: ReviewOrder,
    form: ReviewForm,
    errors: FieldErrors,
) -> Result<ViewInfoTemplate, AppError> {
    let reviews = ReviewRepository::new(state.pool());
    let listing = reviews.list_for_book(book.book_id, order).await?;
    let has_reviewed = match user {
        Some(u) => reviews.exists(book.book_id, u.id).await?,
        None => false,
    };

    Ok(ViewInfoTemplate {
        ctx: PageContext::load(state, session).await?,
        can_review: user.is_some() && !has_reviewed,
        has_reviewed,
        book,
        reviews: listing,
        sort: order.as_param(),
        form,
        errors,
    })
}

/// Display a book with its reviews.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ViewInfoQuery>,
) -> Result<ViewInfoTemplate, AppError> {
    let book = BookRepository::new(state.pool()).get(query.book_id()).await?;

    render(
        &state,
        &session,
        book,
        user.as_ref(),
        query.order(),
        ReviewForm::default(),
        FieldErrors::default(),
    )
    .await
}

/// Post a review for a book.
///
/// Validation failures re-render the page with the form filled in.
#[instrument(skip(state, session, user, form))]
pub async fn create_review(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ViewInfoQuery>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let book = BookRepository::new(state.pool()).get(query.book_id()).await?;
    let user = require_user(&session, user, "Please log in to review this book.").await?;
    let order = query.order();
    let redirect = Redirect::to(&book_url(book.book_id, order));

    let reviews = ReviewRepository::new(state.pool());
    if reviews.exists(book.book_id, user.id).await? {
        push_notice(&session, ALREADY_REVIEWED).await?;
        return Ok(redirect.into_response());
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(
                render(&state, &session, book, Some(&user), order, form, errors)
                    .await?
                    .into_response(),
            );
        }
    };

    match reviews
        .create(book.book_id, user.id, input.star_rating, &input.content)
        .await
    {
        Ok(()) => {
            tracing::info!(book_id = %book.book_id, user_id = %user.id, "Review posted");
            push_notice(&session, "Review submitted").await?;
        }
        // Lost a race with a second submission of the same review.
        Err(RepositoryError::Conflict(_)) => push_notice(&session, ALREADY_REVIEWED).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(redirect.into_response())
}

/// Delete the caller's review of a book.
#[instrument(skip(state, session, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    BookIdPath(book_id): BookIdPath,
) -> Result<Redirect, AppError> {
    let user = require_user(&session, user, "Please log in to delete your reviews.").await?;

    let deleted = ReviewRepository::new(state.pool())
        .delete_own(book_id, user.id)
        .await?;

    let notice = if deleted {
        "Your review has been deleted."
    } else {
        "You have not reviewed this book"
    };
    push_notice(&session, notice).await?;

    Ok(Redirect::to(&format!("/viewinfo?id={book_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_defaults_to_zero() {
        let query = ViewInfoQuery::default();
        assert_eq!(query.book_id(), BookId::new(0));
        assert_eq!(query.order(), ReviewOrder::Newest);
    }

    #[test]
    fn test_query_parsing() {
        let query = ViewInfoQuery {
            id: Some("12".to_string()),
            sort: Some("2".to_string()),
        };
        assert_eq!(query.book_id(), BookId::new(12));
        assert_eq!(query.order(), ReviewOrder::HighestRated);
    }

    #[test]
    fn test_book_url_keeps_sort() {
        assert_eq!(
            book_url(BookId::new(4), ReviewOrder::Oldest),
            "/viewinfo?id=4&sort=1#viewitem-reviews-base"
        );
    }
}
