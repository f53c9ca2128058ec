//! Business logic services for storefront.
//!
//! - `auth` - Account registration and password login

pub mod auth;
