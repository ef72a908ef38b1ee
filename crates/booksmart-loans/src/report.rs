//! # Activity Reports
//!
//! System-wide loan reporting: lifecycle counters, revenue, fines and
//! the most-loaned ranking. Everything is computed from the loan
//! records as of a given date, so a report is reproducible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use booksmart_core::fine::{self, FineStats};
use booksmart_core::{Loan, LoanStatus, Money};
use booksmart_store::{BookRepository, LoanRepository, UserRepository};

/// One row of the most-loaned ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostLoaned {
    pub book_id: i64,
    /// Title as registered; "(removed)" when the book left the catalog.
    pub title: String,
    pub loan_count: usize,
}

/// One row of the fines-by-user ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFines {
    pub user_id: i64,
    /// Name as registered; "(removed)" when the user left the system.
    pub name: String,
    pub overdue_count: usize,
    pub total_fines: Money,
}

/// Snapshot of all loan activity as of `generated_on`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanReport {
    pub generated_on: NaiveDate,
    pub total_loans: usize,
    pub active_loans: usize,
    pub returned_loans: usize,
    pub overdue_loans: usize,
    /// Sum of loan costs after discounts.
    pub total_revenue: Money,
    pub total_fines: Money,
    /// Up to five books, most loans first. Ties keep the lower book id
    /// first, so repeated report runs never reorder rows.
    pub most_loaned: Vec<MostLoaned>,
    /// Users with a positive fine balance, highest total first. Ties
    /// keep the lower user id first.
    pub fines_by_user: Vec<UserFines>,
    pub fine_stats: FineStats,
}

impl LoanReport {
    /// Builds a report over every loan in the catalog.
    pub fn generate(
        books: &BookRepository,
        users: &UserRepository,
        loans: &LoanRepository,
        today: NaiveDate,
    ) -> LoanReport {
        let all = loans.all();

        LoanReport {
            generated_on: today,
            total_loans: all.len(),
            active_loans: all.iter().filter(|l| l.is_active()).count(),
            returned_loans: all
                .iter()
                .filter(|l| matches!(l.status(), LoanStatus::Returned))
                .count(),
            overdue_loans: all.iter().filter(|l| l.is_overdue(today)).count(),
            total_revenue: all.iter().map(|l| l.total_cost).sum(),
            total_fines: all.iter().map(|l| fine::loan_fine(l, today)).sum(),
            most_loaned: most_loaned(books, &all, 5),
            fines_by_user: fines_by_user(users, &all, today),
            fine_stats: FineStats::for_loans(&all, today),
        }
    }
}

/// Ranks books by loan count, descending, ties broken by book id.
fn most_loaned(books: &BookRepository, loans: &[Loan], limit: usize) -> Vec<MostLoaned> {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for loan in loans {
        match counts.iter_mut().find(|(id, _)| *id == loan.book_id) {
            Some((_, n)) => *n += 1,
            None => counts.push((loan.book_id, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    counts
        .into_iter()
        .take(limit)
        .map(|(book_id, loan_count)| MostLoaned {
            book_id,
            title: books
                .get(book_id)
                .map(|b| b.title().to_string())
                .unwrap_or_else(|| "(removed)".to_string()),
            loan_count,
        })
        .collect()
}

/// Ranks users by accumulated fines, descending, ties broken by user
/// id. Users owing nothing are left out.
fn fines_by_user(users: &UserRepository, loans: &[Loan], today: NaiveDate) -> Vec<UserFines> {
    let mut rows: Vec<UserFines> = Vec::new();
    for loan in loans {
        let fine = fine::loan_fine(loan, today);
        if fine.is_zero() {
            continue;
        }
        match rows.iter_mut().find(|r| r.user_id == loan.user_id) {
            Some(row) => {
                row.overdue_count += 1;
                row.total_fines += fine;
            }
            None => rows.push(UserFines {
                user_id: loan.user_id,
                name: users
                    .get(loan.user_id)
                    .map(|u| u.name)
                    .unwrap_or_else(|| "(removed)".to_string()),
                overdue_count: 1,
                total_fines: fine,
            }),
        }
    }

    rows.sort_by(|a, b| b.total_fines.cmp(&a.total_fines).then(a.user_id.cmp(&b.user_id)));
    rows
}
