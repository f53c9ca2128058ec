//! Order writer and order history.
//!
//! Placing an order turns a session cart into one `purchase` header, one
//! `purchased_item` line per distinct book, and a stock decrement plus
//! purchase-counter increment per book. All of it happens in one transaction
//! with the book rows locked, so either every write lands or none does and
//! two checkouts cannot both sell the last copy.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use bookshop_core::{
    BookId, Cart, CartRejection, CheckoutDetails, OrderId, OrderPlan, StockLevel, UserId,
    validate_cart,
};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart failed validation against live stock. Nothing was written.
    #[error("cart rejected: {0}")]
    Rejected(#[from] CartRejection),

    /// Database failure. The transaction was rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

#[derive(sqlx::FromRow)]
struct StockRow {
    book_id: BookId,
    title: String,
    stock_level: i32,
}

impl From<StockRow> for StockLevel {
    fn from(r: StockRow) -> Self {
        Self {
            book_id: r.book_id,
            title: r.title,
            stock_level: r.stock_level,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    purchase_id: OrderId,
    purchase_timestamp: DateTime<Utc>,
    purchase_ship_to: String,
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read current stock for a set of books without locking.
    ///
    /// Used to pre-validate the cart before showing the checkout form; the
    /// authoritative check happens again inside [`Self::place_order`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_levels(&self, ids: &[BookId]) -> Result<Vec<StockLevel>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT book_id, title, stock_level FROM book WHERE book_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(StockLevel::from).collect())
    }

    /// Convert a cart into a persisted order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Rejected` if the cart is empty or any book is
    /// unknown, out of stock, or short; no rows are written in that case.
    /// Returns `OrderError::Repository` if a query fails; the transaction is
    /// rolled back.
    pub async fn place_order(
        &self,
        owner: UserId,
        cart: &Cart,
        details: &CheckoutDetails,
    ) -> Result<OrderId, OrderError> {
        let plan = OrderPlan::from_cart(cart).map_err(CartRejection::from)?;

        let mut tx = self.pool.begin().await?;

        // Lock in id order so concurrent checkouts cannot deadlock.
        let stock: Vec<StockLevel> = sqlx::query_as::<_, StockRow>(
            r"
            SELECT book_id, title, stock_level
            FROM book
            WHERE book_id = ANY($1)
            ORDER BY book_id
            FOR UPDATE
            ",
        )
        .bind(cart.distinct())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(StockLevel::from)
        .collect();

        validate_cart(cart, &stock)?;

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO purchase
                (purchase_user_id, purchase_timestamp, purchase_ship_to, purchase_payment)
            VALUES ($1, NOW(), $2, $3)
            RETURNING purchase_id
            ",
        )
        .bind(owner)
        .bind(details.address.ship_to())
        .bind(details.card.reference())
        .fetch_one(&mut *tx)
        .await?;

        for line in plan.lines() {
            sqlx::query(
                "INSERT INTO purchased_item (purchase_id, item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(line.book_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        for adjustment in plan.stock_adjustments() {
            sqlx::query(
                r"
                UPDATE book
                SET stock_level = stock_level - $2,
                    purchase_counter = purchase_counter + $2
                WHERE book_id = $1
                ",
            )
            .bind(adjustment.book_id)
            .bind(adjustment.units_sold)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            owner = %owner,
            units = plan.total_units(),
            lines = plan.lines().len(),
            "Order placed"
        );

        Ok(order_id)
    }

    /// A user's orders with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let headers = sqlx::query_as::<_, PurchaseRow>(
            r"
            SELECT purchase_id, purchase_timestamp, purchase_ship_to
            FROM purchase
            WHERE purchase_user_id = $1
            ORDER BY purchase_timestamp DESC, purchase_id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<OrderId> = headers.iter().map(|h| h.purchase_id).collect();
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT pi.purchase_id, pi.item_id, b.title, pi.quantity
            FROM purchased_item pi
            JOIN book b ON b.book_id = pi.item_id
            WHERE pi.purchase_id = ANY($1)
            ORDER BY pi.purchase_id, b.title
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let orders = headers
            .into_iter()
            .map(|h| Order {
                id: h.purchase_id,
                placed_at: h.purchase_timestamp,
                ship_to: h.purchase_ship_to,
                items: items
                    .iter()
                    .filter(|i| i.purchase_id == h.purchase_id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(orders)
    }
}
