//! Wishlist repository.

use sqlx::PgPool;

use bookshop_core::{BookId, PriceOrder, UserId};

use super::RepositoryError;
use crate::models::Book;

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a book to the user's wishlist.
    ///
    /// # Returns
    ///
    /// Returns `true` if the book was added, `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(&self, user_id: UserId, book_id: BookId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO wishlist (wishlist_user_id, wishlist_item_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(book_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a book from the user's wishlist.
    ///
    /// # Returns
    ///
    /// Returns `true` if the book was removed, `false` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user_id: UserId, book_id: BookId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM wishlist WHERE wishlist_user_id = $1 AND wishlist_item_id = $2",
        )
        .bind(user_id)
        .bind(book_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Books on the user's wishlist ordered by price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        user_id: UserId,
        order: PriceOrder,
    ) -> Result<Vec<Book>, RepositoryError> {
        let direction = order.sql();
        let sql = format!(
            r"
            SELECT b.book_id, b.title, b.author, b.description, b.isbn_number,
                   b.year_published, b.publisher, b.price, b.image_file,
                   b.purchase_counter, b.stock_level
            FROM wishlist w
            JOIN book b ON b.book_id = w.wishlist_item_id
            WHERE w.wishlist_user_id = $1
            ORDER BY b.price {direction}, b.book_id {direction}
            "
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(books)
    }

    /// Number of books on the user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wishlist WHERE wishlist_user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
