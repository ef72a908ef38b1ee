//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Pesos                                            │
//! │    Catalog prices are whole Chilean pesos (no minor unit in use),      │
//! │    so every amount is an i64 number of pesos.                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Rule
//! Every fractional result (discounts, averages) is FLOORED. The rule is
//! applied through integer division only, never through float casts, so the
//! same input always produces the same peso amount.
//!
//! ## Usage
//! ```rust
//! use booksmart_core::money::Money;
//! use booksmart_core::pricing::DiscountRate;
//!
//! let price = Money::from_pesos(12990);
//! let rate = DiscountRate::from_bps(1000); // 10%
//!
//! assert_eq!(price.discount_amount(rate).pesos(), 1299);
//! assert_eq!(price.apply_discount(rate).pesos(), 11691);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::pricing::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole Chilean pesos.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections/adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    ///
    /// ## Example
    /// ```rust
    /// use booksmart_core::money::Money;
    ///
    /// let price = Money::from_pesos(12990);
    /// assert_eq!(price.pesos(), 12990);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the value in pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates the discount amount for a rate, floored to whole pesos.
    ///
    /// ## Implementation
    /// Integer math only: `amount * bps / 10000`. Integer division floors
    /// the result for the non-negative amounts of this domain.
    ///
    /// ## Example
    /// ```rust
    /// use booksmart_core::money::Money;
    /// use booksmart_core::pricing::DiscountRate;
    ///
    /// let price = Money::from_pesos(12990);
    /// let rate = DiscountRate::from_bps(1000); // 10%
    ///
    /// // 12990 × 10% = 1299 pesos off
    /// assert_eq!(price.discount_amount(rate).pesos(), 1299);
    /// ```
    pub fn discount_amount(&self, rate: DiscountRate) -> Money {
        // i128 to prevent overflow on large amounts
        let off = self.0 as i128 * rate.bps() as i128 / 10_000;
        Money::from_pesos(off as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use booksmart_core::money::Money;
    /// use booksmart_core::pricing::DiscountRate;
    ///
    /// let price = Money::from_pesos(10000);
    /// let discounted = price.apply_discount(DiscountRate::from_bps(1500)); // 15% off
    /// assert_eq!(discounted.pesos(), 8500);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.discount_amount(rate)
    }

    /// Multiplies money by a day count (for per-day fines).
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Self {
        Money(self.0 * days)
    }

    /// Floor-divides money by a count, for averages over loans.
    ///
    /// Returns zero when `count` is zero so report math never divides by
    /// zero on an empty loan list.
    pub const fn divide_floor(&self, count: i64) -> Self {
        if count == 0 {
            Money(0)
        } else {
            Money(self.0 / count)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows pesos with dot thousands separators, the
/// conventional Chilean format ("$12.990").
///
/// ## Note
/// This is for debugging and the demo binary. A real presentation layer
/// should localize amounts itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}${}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for fine-per-day × days calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, n: i64) -> Self {
        Money(self.0 * n)
    }
}

/// Summing an iterator of Money values (for catalog/loan statistics).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(12990);
        assert_eq!(money.pesos(), 12990);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_pesos(12990)), "$12.990");
        assert_eq!(format!("{}", Money::from_pesos(500)), "$500");
        assert_eq!(format!("{}", Money::from_pesos(1500000)), "$1.500.000");
        assert_eq!(format!("{}", Money::from_pesos(-550)), "-$550");
        assert_eq!(format!("{}", Money::from_pesos(0)), "$0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(1000);
        let b = Money::from_pesos(500);

        assert_eq!((a + b).pesos(), 1500);
        assert_eq!((a - b).pesos(), 500);
        let result: Money = a * 3;
        assert_eq!(result.pesos(), 3000);
    }

    #[test]
    fn test_discount_amount_floors() {
        // 9990 × 15% = 1498.5 → floors to 1498
        let amount = Money::from_pesos(9990);
        let rate = DiscountRate::from_bps(1500);
        assert_eq!(amount.discount_amount(rate).pesos(), 1498);
        assert_eq!(amount.apply_discount(rate).pesos(), 8492);
    }

    #[test]
    fn test_discount_exact() {
        // 12990 × 10% = exactly 1299
        let amount = Money::from_pesos(12990);
        let rate = DiscountRate::from_bps(1000);
        assert_eq!(amount.discount_amount(rate).pesos(), 1299);
        assert_eq!(amount.apply_discount(rate).pesos(), 11691);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let amount = Money::from_pesos(18500);
        let rate = DiscountRate::zero();
        assert_eq!(amount.discount_amount(rate), Money::zero());
        assert_eq!(amount.apply_discount(rate), amount);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_pesos(100);
        assert!(positive.is_positive());

        let negative = Money::from_pesos(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_days() {
        // 5 days late at $100/day
        let per_day = Money::from_pesos(100);
        assert_eq!(per_day.multiply_days(5).pesos(), 500);
        assert_eq!(per_day.multiply_days(0).pesos(), 0);
    }

    #[test]
    fn test_divide_floor() {
        let total = Money::from_pesos(1000);
        assert_eq!(total.divide_floor(3).pesos(), 333);
        assert_eq!(total.divide_floor(0).pesos(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300]
            .into_iter()
            .map(Money::from_pesos)
            .sum();
        assert_eq!(total.pesos(), 600);
    }
}
