//! Core types for the bookshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod sort;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use sort::{PriceOrder, ReviewOrder};
pub use username::{Username, UsernameError};
