//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10, 2)` and summed as [`Decimal`], so a cart
//! of three 0.10 items totals exactly 0.30. The shop sells in US dollars only.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol used when rendering prices.
const SYMBOL: &str = "$";

/// A price in the shop currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in dollars, not cents.
    pub amount: Decimal,
}

impl Price {
    /// Create a price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// A zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Decimal::ZERO)
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{SYMBOL}{:.2}", self.amount.round_dp(2))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::new(Decimal::new(5, 0)).display(), "$5.00");
        assert_eq!(Price::new(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(Price::new(Decimal::new(75, 1)).to_string(), "$7.50");
    }

    #[test]
    fn test_sum_is_exact() {
        let dime = Price::new(Decimal::new(10, 2));
        let total: Price = [dime, dime, dime].into_iter().sum();
        assert_eq!(total.amount, Decimal::new(30, 2));
    }

    #[test]
    fn test_times() {
        let price = Price::new(Decimal::new(1250, 2));
        assert_eq!(price.times(3).amount, Decimal::new(3750, 2));
        assert_eq!(price.times(0).amount, Decimal::ZERO);
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total, Price::zero());
    }
}
