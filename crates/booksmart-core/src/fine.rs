//! # Fine Engine
//!
//! Overdue penalties for late returns.
//!
//! ## How Fines Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fine Pipeline                                    │
//! │                                                                         │
//! │  Loan.due_date (2024-06-08)      effective date (2024-06-13)           │
//! │       │                                │                                │
//! │       └──────────────┬─────────────────┘                                │
//! │                      ▼                                                  │
//! │          days_late = max(0, 13 − 8) = 5                                │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │          fine = 5 × $100 = $500                                        │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │          amount due = total_cost + $500                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The "effective date" is the actual return date for returned loans and
//! the caller-supplied "today" otherwise, so a settled loan's fine never
//! keeps growing after the book came back.
//!
//! Every function here is pure; the caller supplies the date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Loan;
use crate::MAX_LATE_RETURNS;

/// Penalty charged per day of late return.
pub const FINE_PER_DAY: Money = Money::from_pesos(100);

// =============================================================================
// Per-Loan Fines
// =============================================================================

/// Days late for a due date as of `today`; never negative.
///
/// ## Example
/// ```rust
/// use booksmart_core::fine::days_late;
/// use chrono::NaiveDate;
///
/// let due = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();
/// assert_eq!(days_late(due, today), 5);
/// assert_eq!(days_late(today, due), 0); // early is not negative
/// ```
pub fn days_late(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days().max(0)
}

/// Fine for a number of late days.
#[inline]
pub fn fine_amount(days: i64) -> Money {
    FINE_PER_DAY.multiply_days(days)
}

/// Days late for a loan, using the actual return date once returned.
pub fn loan_days_late(loan: &Loan, today: NaiveDate) -> i64 {
    days_late(loan.due_date, loan.effective_date(today))
}

/// Fine owed on a loan as of `today`.
pub fn loan_fine(loan: &Loan, today: NaiveDate) -> Money {
    fine_amount(loan_days_late(loan, today))
}

/// Full amount due on a loan: discounted price plus any fine.
pub fn total_with_fine(loan: &Loan, today: NaiveDate) -> Money {
    loan.total_cost + loan_fine(loan, today)
}

// =============================================================================
// Aggregate Summaries
// =============================================================================

/// Fine position across a set of loans (typically one user's).
///
/// `restricted` mirrors the eligibility threshold: a user with
/// `MAX_LATE_RETURNS` or more overdue loans is blocked from borrowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineSummary {
    pub loan_count: usize,
    pub overdue_count: usize,
    pub total_days_late: i64,
    pub total_fines: Money,
    /// Discounted cost of all loans plus all fines.
    pub total_with_fines: Money,
    pub restricted: bool,
}

impl FineSummary {
    /// Sums fines and overdue counts over `loans` as of `today`.
    pub fn for_loans(loans: &[Loan], today: NaiveDate) -> FineSummary {
        let mut overdue_count = 0;
        let mut total_days_late = 0;
        let mut total_fines = Money::zero();
        let mut total_cost = Money::zero();

        for loan in loans {
            let days = loan_days_late(loan, today);
            if days > 0 {
                overdue_count += 1;
                total_days_late += days;
                total_fines += fine_amount(days);
            }
            total_cost += loan.total_cost;
        }

        FineSummary {
            loan_count: loans.len(),
            overdue_count,
            total_days_late,
            total_fines,
            total_with_fines: total_cost + total_fines,
            restricted: overdue_count >= MAX_LATE_RETURNS as usize,
        }
    }
}

/// System-wide fine statistics for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineStats {
    pub loan_count: usize,
    pub overdue_count: usize,
    pub total_fines: Money,
    /// Floor average over all loans; zero when there are none.
    pub average_fine_per_loan: Money,
    /// Floor average over overdue loans only; zero when there are none.
    pub average_fine_per_overdue: Money,
    /// Share of loans that are overdue, 0.0–100.0.
    pub overdue_percentage: f64,
}

impl FineStats {
    /// Aggregates fine statistics over every loan in the system.
    pub fn for_loans(loans: &[Loan], today: NaiveDate) -> FineStats {
        let fines: Vec<Money> = loans.iter().map(|l| loan_fine(l, today)).collect();
        let overdue: Vec<Money> = fines.iter().copied().filter(|f| f.is_positive()).collect();

        let total_fines: Money = fines.iter().copied().sum();
        let overdue_total: Money = overdue.iter().copied().sum();

        let overdue_percentage = if loans.is_empty() {
            0.0
        } else {
            overdue.len() as f64 / loans.len() as f64 * 100.0
        };

        FineStats {
            loan_count: loans.len(),
            overdue_count: overdue.len(),
            total_fines,
            average_fine_per_loan: total_fines.divide_floor(loans.len() as i64),
            average_fine_per_overdue: overdue_total.divide_floor(overdue.len() as i64),
            overdue_percentage,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Book, User};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan_due(due_offset_days: i64, today: NaiveDate) -> Loan {
        // Builds a loan whose due date lands `due_offset_days` after today.
        let book = Book::physical(
            1,
            "Estructuras de Datos",
            "Goodrich",
            "Programacion",
            2020,
            Money::from_pesos(12990),
            7,
            3,
            false,
        )
        .unwrap();
        let user = User::new(2, "Oscar Munoz", "osca.munozs@duocuc.cl", "123456").unwrap();
        let loan_date = today + chrono::Duration::days(due_offset_days - 7);
        Loan::new(1, &book, &user, loan_date).unwrap()
    }

    #[test]
    fn test_days_late_never_negative() {
        let due = date(2024, 6, 8);
        assert_eq!(days_late(due, date(2024, 6, 13)), 5);
        assert_eq!(days_late(due, date(2024, 6, 8)), 0);
        assert_eq!(days_late(due, date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_fine_amount() {
        assert_eq!(fine_amount(0), Money::zero());
        assert_eq!(fine_amount(5).pesos(), 500);
    }

    #[test]
    fn test_loan_five_days_late() {
        // Scenario: due 5 days ago, still out
        let today = date(2024, 6, 13);
        let loan = loan_due(-5, today);

        assert_eq!(loan_days_late(&loan, today), 5);
        assert_eq!(loan_fine(&loan, today).pesos(), 500);
        assert_eq!(total_with_fine(&loan, today).pesos(), 11691 + 500);
    }

    #[test]
    fn test_loan_on_time_has_no_fine() {
        let today = date(2024, 6, 13);
        let loan = loan_due(3, today);

        assert_eq!(loan_fine(&loan, today), Money::zero());
        assert_eq!(total_with_fine(&loan, today).pesos(), 11691);
    }

    #[test]
    fn test_returned_loan_fine_is_frozen() {
        let today = date(2024, 6, 13);
        let mut loan = loan_due(-5, today);
        loan.mark_returned(today).unwrap();

        // A month later the fine is still the 5-day fine, not 35 days
        let much_later = date(2024, 7, 13);
        assert_eq!(loan_fine(&loan, much_later).pesos(), 500);
    }

    #[test]
    fn test_fine_summary_restriction() {
        let today = date(2024, 6, 13);
        let loans = vec![loan_due(-1, today), loan_due(-2, today), loan_due(-3, today)];

        let summary = FineSummary::for_loans(&loans, today);
        assert_eq!(summary.loan_count, 3);
        assert_eq!(summary.overdue_count, 3);
        assert_eq!(summary.total_days_late, 6);
        assert_eq!(summary.total_fines.pesos(), 600);
        assert!(summary.restricted);

        let fine_only = vec![loan_due(-1, today), loan_due(4, today)];
        let summary = FineSummary::for_loans(&fine_only, today);
        assert_eq!(summary.overdue_count, 1);
        assert!(!summary.restricted);
    }

    #[test]
    fn test_fine_stats() {
        let today = date(2024, 6, 13);
        // Fines: 100, 300, 0, 0
        let loans = vec![
            loan_due(-1, today),
            loan_due(-3, today),
            loan_due(0, today),
            loan_due(5, today),
        ];

        let stats = FineStats::for_loans(&loans, today);
        assert_eq!(stats.loan_count, 4);
        assert_eq!(stats.overdue_count, 2);
        assert_eq!(stats.total_fines.pesos(), 400);
        assert_eq!(stats.average_fine_per_loan.pesos(), 100);
        assert_eq!(stats.average_fine_per_overdue.pesos(), 200);
        assert!((stats.overdue_percentage - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_fine_stats_empty() {
        let stats = FineStats::for_loans(&[], date(2024, 6, 13));
        assert_eq!(stats.total_fines, Money::zero());
        assert_eq!(stats.average_fine_per_loan, Money::zero());
        assert_eq!(stats.overdue_percentage, 0.0);
    }
}
