//! Domain models for the storefront.
//!
//! Row types derive `sqlx::FromRow` and are read back by the repositories in
//! [`crate::db`]; session types are serialized into tower-sessions.

pub mod book;
pub mod order;
pub mod review;
pub mod session;
pub mod user;

pub use book::{Book, NewBook};
pub use order::{Order, OrderItem};
pub use review::{BookReview, UserReview};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
