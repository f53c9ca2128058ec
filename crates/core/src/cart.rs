//! The session cart.
//!
//! A cart is an ordered multiset of book ids: adding a book twice means two
//! copies. It is serialized into the session as a plain JSON array, so the
//! representation stays `[3, 7, 3]` rather than a map.

use serde::{Deserialize, Serialize};

use crate::types::BookId;

/// Per-session shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<BookId>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one copy of a book.
    pub fn add(&mut self, book_id: BookId) {
        self.items.push(book_id);
    }

    /// Remove one copy of a book.
    ///
    /// Returns `false` if the book was not in the cart.
    pub fn remove_one(&mut self, book_id: BookId) -> bool {
        match self.items.iter().position(|id| *id == book_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every copy of a book, returning how many were removed.
    pub fn remove_all(&mut self, book_id: BookId) -> usize {
        let before = self.items.len();
        self.items.retain(|id| *id != book_id);
        before - self.items.len()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of copies in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of copies of one book.
    #[must_use]
    pub fn count_of(&self, book_id: BookId) -> u32 {
        let count = self.items.iter().filter(|id| **id == book_id).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Distinct book ids, in the order they were first added.
    #[must_use]
    pub fn distinct(&self) -> Vec<BookId> {
        let mut seen = Vec::new();
        for id in &self.items {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }

    /// Deduplicated `(book, quantity)` pairs, in first-added order.
    #[must_use]
    pub fn quantities(&self) -> Vec<(BookId, u32)> {
        self.distinct()
            .into_iter()
            .map(|id| (id, self.count_of(id)))
            .collect()
    }

    /// Every copy in the cart, in the order added.
    #[must_use]
    pub fn items(&self) -> &[BookId] {
        &self.items
    }
}

impl FromIterator<BookId> for Cart {
    fn from_iter<I: IntoIterator<Item = BookId>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
