//! Review repository.
//!
//! The `review` table is keyed by `(book_about, reviewer_id)`, so a user can
//! review each book at most once.

use sqlx::PgPool;

use bookshop_core::{BookId, ReviewOrder, UserId};

use super::RepositoryError;
use crate::models::{BookReview, UserReview};

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a book with reviewer usernames.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_book(
        &self,
        book_id: BookId,
        order: ReviewOrder,
    ) -> Result<Vec<BookReview>, RepositoryError> {
        let sql = format!(
            r"
            SELECT r.book_about, r.reviewer_id, u.username, r.timestamp, r.star_rating, r.content
            FROM review r
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.book_about = $1
            ORDER BY {}
            ",
            order.sql()
        );

        let reviews = sqlx::query_as::<_, BookReview>(&sql)
            .bind(book_id)
            .fetch_all(self.pool)
            .await?;

        Ok(reviews)
    }

    /// Reviews written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<UserReview>, RepositoryError> {
        let reviews = sqlx::query_as::<_, UserReview>(
            r"
            SELECT r.book_about, b.title, r.timestamp, r.star_rating, r.content
            FROM review r
            JOIN book b ON b.book_id = r.book_about
            WHERE r.reviewer_id = $1
            ORDER BY r.timestamp DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Whether the user has already reviewed the book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, book_id: BookId, user_id: UserId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM review WHERE book_about = $1 AND reviewer_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Store a review stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed the book.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        book_id: BookId,
        user_id: UserId,
        star_rating: i32,
        content: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO review (book_about, reviewer_id, timestamp, star_rating, content)
            VALUES ($1, $2, NOW(), $3, $4)
            ",
        )
        .bind(book_id)
        .bind(user_id)
        .bind(star_rating)
        .bind(content)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::conflict_on_unique(e, "review"))?;

        Ok(())
    }

    /// Delete the user's own review of a book.
    ///
    /// # Returns
    ///
    /// Returns `true` if a review was deleted, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_own(
        &self,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM review WHERE book_about = $1 AND reviewer_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
