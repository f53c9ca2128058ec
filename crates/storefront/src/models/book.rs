//! Catalog book.

use rust_decimal::Decimal;

use bookshop_core::{BookId, Price};

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn_number: String,
    pub year_published: i32,
    pub publisher: String,
    pub price: Decimal,
    pub image_file: String,
    pub purchase_counter: i32,
    pub stock_level: i32,
}

impl Book {
    /// Unit price in the shop currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(self.price)
    }

    /// Whether at least one copy can be sold.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_level > 0
    }

    /// Path of the cover image under `/static`.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/static/images/{}", self.image_file)
    }
}

/// A catalog entry to insert or update, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub isbn_number: String,
    pub year_published: i32,
    pub publisher: String,
    pub price: Decimal,
    #[serde(default = "default_image_file")]
    pub image_file: String,
    #[serde(default)]
    pub stock_level: i32,
}

fn default_image_file() -> String {
    "default.jpg".to_owned()
}
