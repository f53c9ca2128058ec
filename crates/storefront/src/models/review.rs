//! Review read models.

use chrono::{DateTime, Utc};

use bookshop_core::{BookId, UserId};

/// A review on the book detail page, with the reviewer's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookReview {
    pub book_about: BookId,
    pub reviewer_id: UserId,
    pub username: String,
    pub timestamp: DateTime<Utc>,
    pub star_rating: i32,
    pub content: String,
}

/// A review on the account page, with the reviewed book's title.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserReview {
    pub book_about: BookId,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub star_rating: i32,
    pub content: String,
}
