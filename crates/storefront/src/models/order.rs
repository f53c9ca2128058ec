//! Order read models for the account page.

use chrono::{DateTime, Utc};

use bookshop_core::{BookId, OrderId};

/// A placed order with its lines.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub ship_to: String,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Copies across all lines.
    #[must_use]
    pub fn units(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

/// One line of an order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub purchase_id: OrderId,
    pub item_id: BookId,
    pub title: String,
    pub quantity: i32,
}
