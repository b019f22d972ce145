//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront prices are in a single currency and displayed with a
//! dollar sign and two decimals (`$6.00`). Amounts are never negative:
//! the only constructor takes unsigned cents.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative amount of money.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a whole number of cents.
    ///
    /// ```rust
    /// # use pumpkin_express_core::Price;
    /// assert_eq!(Price::from_cents(600).to_string(), "$6.00");
    /// ```
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the decimal amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_two_decimals() {
        assert_eq!(Price::from_cents(2000).to_string(), "$20.00");
        assert_eq!(Price::from_cents(1299).to_string(), "$12.99");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_price_times_and_sum() {
        let six = Price::from_cents(600);
        assert_eq!(six.times(2), Price::from_cents(1200));
        assert_eq!(six.times(0), Price::ZERO);

        let total: Price = [six, Price::from_cents(2000)].into_iter().sum();
        assert_eq!(total, Price::from_cents(2600));
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_cents(600) < Price::from_cents(1200));
    }
}
