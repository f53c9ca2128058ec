//! Bookshop Core - Domain types and checkout rules.
//!
//! This crate provides the types shared by the bookshop components:
//! - `storefront` - The public web shop
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The storefront reads catalog rows and hands them to the
//! functions here, which keeps the checkout arithmetic testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, usernames and sort orders
//! - [`cart`] - The session cart multiset
//! - [`checkout`] - Cart validation against stock and order planning

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use cart::Cart;
pub use checkout::{
    CartError, CartRejection, CheckoutDetails, OrderLine, OrderPlan, PaymentCard, PaymentCardError,
    ShippingAddress, StockAdjustment, StockLevel, validate_cart,
};
pub use types::*;
