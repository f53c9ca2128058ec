//! Checkout rules: cart validation against stock and order planning.
//!
//! The storefront reads the current stock rows for the books in a cart (inside
//! the checkout transaction, with the rows locked), then calls
//! [`validate_cart`] and [`OrderPlan::from_cart`]. Everything here is pure so
//! the rules can be tested without a database.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::BookId;

/// Live stock for one book, read at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    /// Book this row describes.
    pub book_id: BookId,
    /// Title, used in customer-facing messages.
    pub title: String,
    /// Copies on hand.
    pub stock_level: i32,
}

/// A reason a cart cannot be checked out.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The cart has no items.
    #[error("There are no items in your cart.")]
    EmptyCart,

    /// A book in the cart is no longer in the catalog.
    #[error("An item in your cart is no longer available (book {0}).")]
    UnknownBook(BookId),

    /// A book has no stock at all.
    #[error("{title} is out of stock and cannot be purchased.")]
    OutOfStock {
        /// Book that is out of stock.
        book_id: BookId,
        /// Its title.
        title: String,
    },

    /// A book has some stock, but fewer copies than the cart asks for.
    #[error("We only have {available} {} of {title} in stock.", copies(.available))]
    InsufficientStock {
        /// Book that is short.
        book_id: BookId,
        /// Its title.
        title: String,
        /// Copies on hand.
        available: i32,
        /// Copies in the cart.
        requested: u32,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn copies(n: &i32) -> &'static str {
    if *n == 1 { "copy" } else { "copies" }
}

/// Every problem found while validating a cart.
///
/// Never empty: [`validate_cart`] only returns a rejection when it found at
/// least one problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRejection {
    errors: Vec<CartError>,
}

impl CartRejection {
    /// The individual problems, in cart order.
    #[must_use]
    pub fn errors(&self) -> &[CartError] {
        &self.errors
    }

    /// One customer-facing message per problem.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl From<CartError> for CartRejection {
    fn from(error: CartError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for CartRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notices().join(" "))
    }
}

impl std::error::Error for CartRejection {}

/// Check that every book in the cart can be sold in the quantity requested.
///
/// `stock` must be a fresh read of the catalog rows for the cart's books; a
/// missing row means the book was deleted after it was added to the cart.
///
/// # Errors
///
/// Returns a [`CartRejection`] listing every problem: an empty cart, unknown
/// books, books out of stock, and books with fewer copies than requested.
pub fn validate_cart(cart: &Cart, stock: &[StockLevel]) -> Result<(), CartRejection> {
    if cart.is_empty() {
        return Err(CartError::EmptyCart.into());
    }

    let mut errors = Vec::new();
    for (book_id, requested) in cart.quantities() {
        let Some(level) = stock.iter().find(|s| s.book_id == book_id) else {
            errors.push(CartError::UnknownBook(book_id));
            continue;
        };

        if level.stock_level < 1 {
            errors.push(CartError::OutOfStock {
                book_id,
                title: level.title.clone(),
            });
        } else if i64::from(level.stock_level) < i64::from(requested) {
            errors.push(CartError::InsufficientStock {
                book_id,
                title: level.title.clone(),
                available: level.stock_level,
                requested,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CartRejection { errors })
    }
}

/// One row of `purchased_item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// Book sold.
    pub book_id: BookId,
    /// Copies sold.
    pub quantity: i32,
}

/// The catalog change for one book after a sale.
///
/// Applied as `stock_level -= units_sold` and `purchase_counter += units_sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    /// Book sold.
    pub book_id: BookId,
    /// Copies sold.
    pub units_sold: i32,
}

impl StockAdjustment {
    /// Apply to a `(stock_level, purchase_counter)` pair.
    #[must_use]
    pub const fn apply(&self, stock_level: i32, purchase_counter: i32) -> (i32, i32) {
        (
            stock_level - self.units_sold,
            purchase_counter + self.units_sold,
        )
    }
}

/// Everything the order writer inserts and updates for one cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    lines: Vec<OrderLine>,
    adjustments: Vec<StockAdjustment>,
}

impl OrderPlan {
    /// Plan an order from a cart.
    ///
    /// Lines are the deduplicated cart. Adjustments walk every unit of the
    /// cart, one copy at a time, and fold them per book.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] for an empty cart, so an empty cart
    /// can never produce an order header.
    pub fn from_cart(cart: &Cart) -> Result<Self, CartError> {
        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let lines = cart
            .quantities()
            .into_iter()
            .map(|(book_id, quantity)| OrderLine {
                book_id,
                quantity: i32::try_from(quantity).unwrap_or(i32::MAX),
            })
            .collect();

        let mut adjustments: Vec<StockAdjustment> = Vec::new();
        for book_id in cart.items() {
            match adjustments.iter_mut().find(|a| a.book_id == *book_id) {
                Some(adjustment) => adjustment.units_sold += 1,
                None => adjustments.push(StockAdjustment {
                    book_id: *book_id,
                    units_sold: 1,
                }),
            }
        }

        Ok(Self { lines, adjustments })
    }

    /// Rows to insert into `purchased_item`.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Catalog updates, one per distinct book.
    #[must_use]
    pub fn stock_adjustments(&self) -> &[StockAdjustment] {
        &self.adjustments
    }

    /// Total copies sold; equals the cart size.
    #[must_use]
    pub fn total_units(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name.
    pub name: String,
    /// First address line.
    pub street: String,
    /// Town or city.
    pub town: String,
    /// Postcode.
    pub postcode: String,
}

impl ShippingAddress {
    /// Serialized form stored in `purchase.purchase_ship_to`.
    #[must_use]
    pub fn ship_to(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.name, self.street, self.town, self.postcode
        )
    }
}

/// Card details, stored as an opaque reference. No payment is taken.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentCard {
    number: u64,
    ccv: u16,
}

/// Card fields outside their allowed ranges.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCardError {
    /// Card number is zero or longer than 16 digits.
    #[error("Card Number are 16 characters long")]
    Number,
    /// CCV is zero or longer than 3 digits.
    #[error("CCV are 3 characters long")]
    Ccv,
}

impl PaymentCard {
    /// Largest accepted card number (16 digits).
    pub const MAX_NUMBER: u64 = 9_999_999_999_999_999;
    /// Largest accepted CCV (3 digits).
    pub const MAX_CCV: u16 = 999;

    /// Validate card fields.
    ///
    /// # Errors
    ///
    /// Returns the first field outside its range.
    pub const fn new(number: u64, ccv: u16) -> Result<Self, PaymentCardError> {
        if number < 1 || number > Self::MAX_NUMBER {
            return Err(PaymentCardError::Number);
        }
        if ccv < 1 || ccv > Self::MAX_CCV {
            return Err(PaymentCardError::Ccv);
        }
        Ok(Self { number, ccv })
    }

    /// Serialized form stored in `purchase.purchase_payment`: the number
    /// zero-padded to 16 digits and the CCV to 3.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("{:016}, {:03}", self.number, self.ccv)
    }
}

impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCard")
            .field("number", &"[REDACTED]")
            .field("ccv", &"[REDACTED]")
            .finish()
    }
}

/// Validated checkout form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Shipping address.
    pub address: ShippingAddress,
    /// Card reference.
    pub card: PaymentCard,
}
