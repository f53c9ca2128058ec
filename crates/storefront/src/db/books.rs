//! Catalog repository.

use sqlx::PgPool;

use bookshop_core::{BookId, PriceOrder};

use super::RepositoryError;
use crate::models::{Book, NewBook};

const BOOK_COLUMNS: &str = "book_id, title, author, description, isbn_number, year_published, \
     publisher, price, image_file, purchase_counter, stock_level";

/// Repository for the `book` table.
pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every book ordered by price.
    ///
    /// Ties are broken by `book_id` in the same direction, so the ascending
    /// and descending listings are exact reverses of each other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, order: PriceOrder) -> Result<Vec<Book>, RepositoryError> {
        let direction = order.sql();
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM book ORDER BY price {direction}, book_id {direction}"
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(books)
    }

    /// Get a book by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such book exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BookId) -> Result<Book, RepositoryError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM book WHERE book_id = $1");

        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get every book whose ID is in `ids`. Missing IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[BookId]) -> Result<Vec<Book>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {BOOK_COLUMNS} FROM book WHERE book_id = ANY($1)");

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(ids)
            .fetch_all(self.pool)
            .await?;

        Ok(books)
    }

    /// Insert a book, or update the existing row with the same ISBN.
    ///
    /// Sales history (`purchase_counter`) is kept on update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_by_isbn(&self, book: &NewBook) -> Result<BookId, RepositoryError> {
        let id: BookId = sqlx::query_scalar(
            r"
            INSERT INTO book (
                title, author, description, isbn_number, year_published,
                publisher, price, image_file, purchase_counter, stock_level
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9)
            ON CONFLICT (isbn_number) DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                description = EXCLUDED.description,
                year_published = EXCLUDED.year_published,
                publisher = EXCLUDED.publisher,
                price = EXCLUDED.price,
                image_file = EXCLUDED.image_file,
                stock_level = EXCLUDED.stock_level
            RETURNING book_id
            ",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.isbn_number)
        .bind(book.year_published)
        .bind(&book.publisher)
        .bind(book.price)
        .bind(&book.image_file)
        .bind(book.stock_level)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}
