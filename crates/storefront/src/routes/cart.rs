//! Cart and checkout route handlers.
//!
//! The cart is a list of book ids kept in the session. Checkout is open to
//! anonymous visitors; their orders are recorded against the anonymous owner.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use bookshop_core::{BookId, Cart, CartRejection, Price, UserId, validate_cart};

use crate::db::{BookRepository, OrderError, OrderRepository};
use crate::error::AppError;
use crate::forms::{CheckoutForm, FieldErrors};
use crate::middleware::{
    OptionalAuth, PageContext, clear_cart, load_cart, push_notice, push_notices, save_cart,
};
use crate::models::Book;
use crate::routes::BookIdPath;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// One distinct book in the cart.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub book_id: BookId,
    pub title: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_price: Price,
    pub total_quantity: usize,
}

impl CartView {
    /// Price the cart against catalog rows.
    ///
    /// Returns the view and the ids that have no catalog row.
    #[must_use]
    pub fn build(cart: &Cart, books: &[Book]) -> (Self, Vec<BookId>) {
        let by_id: HashMap<BookId, &Book> = books.iter().map(|b| (b.book_id, b)).collect();

        let mut missing = Vec::new();
        let mut lines = Vec::new();
        for (book_id, quantity) in cart.quantities() {
            match by_id.get(&book_id) {
                Some(book) => {
                    let unit_price = book.unit_price();
                    lines.push(CartLineView {
                        book_id,
                        title: book.title.clone(),
                        unit_price,
                        quantity,
                        line_total: unit_price.times(quantity),
                    });
                }
                None => missing.push(book_id),
            }
        }

        let view = Self {
            total_price: lines.iter().map(|l| l.line_total).sum(),
            total_quantity: lines.iter().map(|l| l.quantity as usize).sum(),
            lines,
        };
        (view, missing)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub form: CheckoutForm,
    pub errors: FieldErrors,
}

// =============================================================================
// Helpers
// =============================================================================

/// Check the cart against current stock without locking.
async fn rejection(state: &AppState, cart: &Cart) -> Result<Option<CartRejection>, AppError> {
    let stock = OrderRepository::new(state.pool())
        .stock_levels(&cart.distinct())
        .await?;
    Ok(validate_cart(cart, &stock).err())
}

async fn reject(session: &Session, rejection: &CartRejection) -> Result<Response, AppError> {
    tracing::info!(reason = %rejection, "Checkout rejected");
    push_notices(session, rejection.notices()).await?;
    Ok(Redirect::to("/cart").into_response())
}

// =============================================================================
// Cart Routes
// =============================================================================

/// Display the cart.
///
/// Entries whose book has left the catalog are dropped with a notice.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<CartTemplate, AppError> {
    let mut cart = load_cart(&session).await?;
    let books = BookRepository::new(state.pool())
        .get_many(&cart.distinct())
        .await?;

    let (view, missing) = CartView::build(&cart, &books);
    if !missing.is_empty() {
        for book_id in &missing {
            cart.remove_all(*book_id);
        }
        save_cart(&session, &cart).await?;
        tracing::info!(?missing, "Pruned unknown books from cart");
        push_notice(
            &session,
            "Some items in your cart are no longer available and have been removed.",
        )
        .await?;
    }

    Ok(CartTemplate {
        ctx: PageContext::load(&state, &session).await?,
        cart: view,
    })
}

/// Add one copy of a book to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    BookIdPath(book_id): BookIdPath,
) -> Result<Redirect, AppError> {
    let book = BookRepository::new(state.pool()).get(book_id).await?;

    let mut cart = load_cart(&session).await?;
    cart.add(book.book_id);
    save_cart(&session, &cart).await?;
    push_notice(
        &session,
        format!("{} has been added to your shopping cart.", book.title),
    )
    .await?;

    Ok(Redirect::to("/cart"))
}

/// Remove one copy of a book from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    BookIdPath(book_id): BookIdPath,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;

    let notice = if cart.remove_one(book_id) {
        save_cart(&session, &cart).await?;
        "Item removed from your cart."
    } else {
        "That item is not in your cart."
    };
    push_notice(&session, notice).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove everything from the cart.
#[instrument(skip(session))]
pub async fn empty(session: Session) -> Result<Redirect, AppError> {
    clear_cart(&session).await?;
    Ok(Redirect::to("/cart"))
}

// =============================================================================
// Checkout Routes
// =============================================================================

/// Display the checkout form, or bounce back to the cart if it cannot be bought.
#[instrument(skip(state, session))]
pub async fn checkout_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    if let Some(rejection) = rejection(&state, &cart).await? {
        return reject(&session, &rejection).await;
    }

    Ok(CheckoutTemplate {
        ctx: PageContext::load(&state, &session).await?,
        form: CheckoutForm::default(),
        errors: FieldErrors::default(),
    }
    .into_response())
}

/// Place the order.
///
/// The session cart is cleared only once the order transaction has committed.
#[instrument(skip(state, session, user, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    if let Some(rejection) = rejection(&state, &cart).await? {
        return reject(&session, &rejection).await;
    }

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            return Ok(CheckoutTemplate {
                ctx: PageContext::load(&state, &session).await?,
                form,
                errors,
            }
            .into_response());
        }
    };

    let owner = user.map_or(UserId::ANONYMOUS, |u| u.id);
    match OrderRepository::new(state.pool())
        .place_order(owner, &cart, &details)
        .await
    {
        Ok(_) => {
            clear_cart(&session).await?;
            push_notice(&session, "Purchase successful").await?;
            Ok(Redirect::to("/").into_response())
        }
        // Stock moved between the pre-check and the locked re-check.
        Err(OrderError::Rejected(rejection)) => reject(&session, &rejection).await,
        Err(OrderError::Repository(e)) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn book(id: i32, price: &str) -> Book {
        Book {
            book_id: BookId::new(id),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            description: String::new(),
            isbn_number: format!("978000000000{id}"),
            year_published: 2001,
            publisher: "Publisher".to_string(),
            price: Decimal::from_str(price).unwrap(),
            image_file: "default.jpg".to_string(),
            purchase_counter: 0,
            stock_level: 5,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let cart: Cart = [1, 2, 1].into_iter().map(BookId::new).collect();
        let books = vec![book(1, "5.00"), book(2, "10.00")];

        let (view, missing) = CartView::build(&cart, &books);

        assert!(missing.is_empty());
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.lines[0].line_total.amount, Decimal::from(10));
        assert_eq!(view.total_price.amount, Decimal::from(20));
        assert_eq!(view.total_quantity, 3);
    }

    #[test]
    fn test_cart_view_sums_exactly() {
        let cart: Cart = [1, 1, 1].into_iter().map(BookId::new).collect();
        let (view, _) = CartView::build(&cart, &[book(1, "0.10")]);
        assert_eq!(view.total_price.amount, Decimal::from_str("0.30").unwrap());
    }

    #[test]
    fn test_cart_view_reports_missing_books() {
        let cart: Cart = [1, 9].into_iter().map(BookId::new).collect();
        let (view, missing) = CartView::build(&cart, &[book(1, "5.00")]);

        assert_eq!(missing, vec![BookId::new(9)]);
        assert_eq!(view.total_quantity, 1);
    }

    #[test]
    fn test_empty_cart_view() {
        let (view, missing) = CartView::build(&Cart::new(), &[]);
        assert!(view.lines.is_empty());
        assert!(missing.is_empty());
        assert_eq!(view.total_price.amount, Decimal::ZERO);
    }
}
