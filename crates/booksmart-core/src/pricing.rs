//! # Pricing Engine
//!
//! Discount math for user categories.
//!
//! ## How Discounts Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Discount Pipeline                                   │
//! │                                                                         │
//! │  Book.base_price ($12.990)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UserCategory → DiscountRate (Student = 1000 bps = 10%)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  discount = floor(12990 × 10%) = $1.299                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  final  = 12990 − 1299 = $11.691  → frozen into the Loan               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: no state, no clock, no store access.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Book, Loan, UserCategory};

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (student rate). Integer bps keep the floor rule exact;
/// a float rate would make the rounding depend on binary representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// The fixed per-category rates: student 10%, faculty 15%, everyone
    /// else (external, admin) 0%.
    pub const fn for_category(category: UserCategory) -> Self {
        match category {
            UserCategory::Student => DiscountRate(1000),
            UserCategory::Faculty => DiscountRate(1500),
            UserCategory::External | UserCategory::Admin => DiscountRate(0),
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Quotes
// =============================================================================

/// Discount breakdown for a single book and one user category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountQuote {
    pub category: UserCategory,
    pub rate: DiscountRate,
    pub base_price: Money,
    pub discount: Money,
    pub final_price: Money,
}

/// Quotes the discounted price of one book for a user category.
///
/// ## Example
/// ```rust
/// use booksmart_core::money::Money;
/// use booksmart_core::pricing::quote;
/// use booksmart_core::types::UserCategory;
///
/// let q = quote(UserCategory::Student, Money::from_pesos(12990));
/// assert_eq!(q.discount.pesos(), 1299);
/// assert_eq!(q.final_price.pesos(), 11691);
/// ```
pub fn quote(category: UserCategory, base_price: Money) -> DiscountQuote {
    let rate = category.discount_rate();
    let discount = base_price.discount_amount(rate);

    DiscountQuote {
        category,
        rate,
        base_price,
        discount,
        final_price: base_price - discount,
    }
}

/// Discount breakdown across several books for one user category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiQuote {
    pub category: UserCategory,
    pub quotes: Vec<DiscountQuote>,
    pub subtotal: Money,
    pub total_discount: Money,
    pub total_final: Money,
    pub book_count: usize,
}

/// Quotes a whole stack of books for one user category, summing base
/// prices, discount amounts and final prices.
pub fn quote_books<'a, I>(category: UserCategory, books: I) -> MultiQuote
where
    I: IntoIterator<Item = &'a Book>,
{
    let quotes: Vec<DiscountQuote> = books
        .into_iter()
        .map(|book| quote(category, book.base_price()))
        .collect();

    let subtotal = quotes.iter().map(|q| q.base_price).sum();
    let total_discount = quotes.iter().map(|q| q.discount).sum();
    let total_final = quotes.iter().map(|q| q.final_price).sum();

    MultiQuote {
        category,
        book_count: quotes.len(),
        quotes,
        subtotal,
        total_discount,
        total_final,
    }
}

// =============================================================================
// Accumulated Savings
// =============================================================================

/// What a user's discounts have saved them across their loan history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    /// Sum of base prices had no discount applied.
    pub total_without_discount: Money,
    /// Sum of what was actually charged.
    pub total_paid: Money,
    /// Difference between the two.
    pub total_saved: Money,
    pub loan_count: usize,
    /// Floor average saving per loan; zero for an empty history.
    pub average_saved: Money,
}

/// Sums discount savings over a loan history.
pub fn accumulated_savings(loans: &[Loan]) -> Savings {
    let total_without_discount: Money = loans.iter().map(|l| l.base_price).sum();
    let total_paid: Money = loans.iter().map(|l| l.total_cost).sum();
    let total_saved = total_without_discount - total_paid;

    Savings {
        total_without_discount,
        total_paid,
        total_saved,
        loan_count: loans.len(),
        average_saved: total_saved.divide_floor(loans.len() as i64),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use chrono::NaiveDate;

    #[test]
    fn test_rates_per_category() {
        assert_eq!(DiscountRate::for_category(UserCategory::Student).bps(), 1000);
        assert_eq!(DiscountRate::for_category(UserCategory::Faculty).bps(), 1500);
        assert_eq!(DiscountRate::for_category(UserCategory::External).bps(), 0);
        assert_eq!(DiscountRate::for_category(UserCategory::Admin).bps(), 0);
    }

    #[test]
    fn test_rate_percentage() {
        let rate = DiscountRate::from_bps(1500);
        assert!((rate.percentage() - 15.0).abs() < 0.001);
        assert!(!rate.is_zero());
        assert!(DiscountRate::zero().is_zero());
    }

    #[test]
    fn test_student_quote() {
        let q = quote(UserCategory::Student, Money::from_pesos(12990));
        assert_eq!(q.rate.bps(), 1000);
        assert_eq!(q.base_price.pesos(), 12990);
        assert_eq!(q.discount.pesos(), 1299);
        assert_eq!(q.final_price.pesos(), 11691);
    }

    #[test]
    fn test_external_quote_is_full_price() {
        let q = quote(UserCategory::External, Money::from_pesos(9990));
        assert_eq!(q.discount.pesos(), 0);
        assert_eq!(q.final_price.pesos(), 9990);
    }

    #[test]
    fn test_faculty_quote_floors() {
        // 9990 × 15% = 1498.5 → 1498
        let q = quote(UserCategory::Faculty, Money::from_pesos(9990));
        assert_eq!(q.discount.pesos(), 1498);
        assert_eq!(q.final_price.pesos(), 8492);
    }

    #[test]
    fn test_multi_quote_sums() {
        let books = vec![
            Book::physical(1, "A", "X", "C", 2020, Money::from_pesos(10000), 7, 1, false).unwrap(),
            Book::digital(
                2,
                "B",
                "Y",
                "C",
                2021,
                Money::from_pesos(5000),
                10,
                false,
                crate::types::FileFormat::Pdf,
                1.0,
            )
            .unwrap(),
        ];

        let mq = quote_books(UserCategory::Student, &books);
        assert_eq!(mq.book_count, 2);
        assert_eq!(mq.subtotal.pesos(), 15000);
        assert_eq!(mq.total_discount.pesos(), 1500);
        assert_eq!(mq.total_final.pesos(), 13500);
    }

    #[test]
    fn test_multi_quote_empty() {
        let mq = quote_books(UserCategory::Faculty, &[]);
        assert_eq!(mq.book_count, 0);
        assert_eq!(mq.subtotal, Money::zero());
        assert_eq!(mq.total_final, Money::zero());
    }

    #[test]
    fn test_accumulated_savings() {
        let book =
            Book::physical(1, "A", "X", "C", 2020, Money::from_pesos(10000), 7, 5, false).unwrap();
        let user = User::new(1, "Ana Soto", "ana@duocuc.cl", "123456").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let loans = vec![
            Loan::new(1, &book, &user, today).unwrap(),
            Loan::new(2, &book, &user, today).unwrap(),
        ];

        let savings = accumulated_savings(&loans);
        assert_eq!(savings.total_without_discount.pesos(), 20000);
        assert_eq!(savings.total_paid.pesos(), 18000);
        assert_eq!(savings.total_saved.pesos(), 2000);
        assert_eq!(savings.average_saved.pesos(), 1000);
        assert_eq!(savings.loan_count, 2);
    }

    #[test]
    fn test_accumulated_savings_empty() {
        let savings = accumulated_savings(&[]);
        assert_eq!(savings.total_saved, Money::zero());
        assert_eq!(savings.average_saved, Money::zero());
    }
}
