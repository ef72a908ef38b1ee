//! # Loan Repository
//!
//! Loan records and the two multi-entity sequences of the system:
//! loan creation and loan return. Both run inside a single
//! `with_catalog_mut` closure, so the check-then-act steps can never
//! interleave with another task.
//!
//! ## Atomic Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create(book_id, user_id)                             │
//! │                         ── ONE lock hold ──                             │
//! │                                                                         │
//! │  1. Look up book            ── missing? → NotFound                      │
//! │  2. Look up user            ── missing? → NotFound                      │
//! │  3. Reserve physical copy   ── none left? → Domain(CopyUnavailable)     │
//! │  4. Build loan record       ── ineligible? → Domain, copy released      │
//! │     (price snapshot frozen here)                                        │
//! │  5. Allocate id, push loan                                              │
//! │                                                                         │
//! │  A failure at any step leaves the catalog exactly as it was.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomic Return
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    finalize_return(loan_id, today)                      │
//! │                         ── ONE lock hold ──                             │
//! │                                                                         │
//! │  1. Look up loan            ── missing? → NotFound                      │
//! │  2. Returned already?       ── yes → AlreadyReturned (no double release)│
//! │  3. Mark returned           ── Error state? → Domain                    │
//! │  4. Release physical copy                                               │
//! │  5. Late? bump the user's late-return counter                          │
//! │  6. Compute fine and amount due                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::CatalogStore;
use booksmart_core::fine;
use booksmart_core::{Loan, LoanStatus, Money};

/// Outcome of a completed return.
///
/// ## Design Notes
/// - `loan`: Frozen copy of the record after the transition
/// - `days_late` / `fine`: Computed against the return date, so the
///   fine never grows after this point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRecord {
    pub loan: Loan,
    pub days_late: i64,
    pub fine: Money,
    /// Loan cost plus fine.
    pub amount_due: Money,
}

/// Loan-wide counters and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStats {
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub total_amount: Money,
    pub total_fines: Money,
}

/// Repository for loan operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = LoanRepository::new(store.clone());
///
/// let loan = repo.create(3, 2, today)?;
/// let record = repo.finalize_return(loan.id, today)?;
/// ```
#[derive(Debug, Clone)]
pub struct LoanRepository {
    store: CatalogStore,
}

impl LoanRepository {
    /// Creates a new LoanRepository.
    pub fn new(store: CatalogStore) -> Self {
        LoanRepository { store }
    }

    /// Creates a loan, reserving a physical copy in the same step.
    ///
    /// The price snapshot (base price, discount, total) is frozen here
    /// from the user's category rate. Later price or category changes
    /// never touch existing loans.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - unknown book or user id
    /// * `StoreError::Domain(CopyUnavailable)` - no copy could be
    ///   reserved; this is what a caller sees when it loses the race
    ///   for the last copy after its own availability check passed
    /// * `StoreError::Domain` - book not loanable, user ineligible
    pub fn create(&self, book_id: i64, user_id: i64, today: NaiveDate) -> StoreResult<Loan> {
        debug!(book_id, user_id, "Creating loan");

        let loan = self.store.with_catalog_mut(|cat| {
            let book = cat
                .book(book_id)
                .ok_or_else(|| StoreError::not_found("Book", book_id))?
                .clone();
            let user = cat
                .user(user_id)
                .ok_or_else(|| StoreError::not_found("User", user_id))?
                .clone();

            // Reserve before anything else, so an exhausted book always
            // surfaces as CopyUnavailable here.
            if let Some(live) = cat.book_mut(book_id) {
                live.reserve_copy()?;
            }

            // Validates loanability and eligibility against the
            // pre-reserve snapshot, freezing the price. A failure puts
            // the copy straight back.
            let mut loan = match Loan::new(0, &book, &user, today) {
                Ok(loan) => loan,
                Err(err) => {
                    if let Some(live) = cat.book_mut(book_id) {
                        live.release_copy();
                    }
                    return Err(err.into());
                }
            };

            loan.id = cat.allocate_loan_id();
            cat.loans.push(loan.clone());
            Ok::<_, StoreError>(loan)
        })?;

        debug!(loan_id = loan.id, total = %loan.total_cost, "Loan created");
        Ok(loan)
    }

    /// Stores an already-constructed loan record, e.g. one restored from
    /// an export. Normal flow goes through [`LoanRepository::create`].
    ///
    /// ## Errors
    /// * `StoreError::Duplicate` - a loan with the same id already exists
    pub fn insert(&self, loan: Loan) -> StoreResult<()> {
        self.store.with_catalog_mut(|cat| {
            if cat.loan(loan.id).is_some() {
                return Err(StoreError::duplicate("loan id", loan.id.to_string()));
            }
            cat.loans.push(loan);
            Ok(())
        })
    }

    /// Gets a loan by id.
    pub fn get(&self, id: i64) -> Option<Loan> {
        self.store.with_catalog(|cat| cat.loan(id).cloned())
    }

    /// Lists every loan for one user, oldest first.
    pub fn by_user(&self, user_id: i64) -> Vec<Loan> {
        self.store.with_catalog(|cat| {
            cat.loans
                .iter()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    /// Lists loans in the `Pending` or `InProgress` state.
    pub fn active(&self) -> Vec<Loan> {
        self.store
            .with_catalog(|cat| cat.loans.iter().filter(|l| l.is_active()).cloned().collect())
    }

    /// Lists a user's active loans.
    pub fn active_for_user(&self, user_id: i64) -> Vec<Loan> {
        self.store.with_catalog(|cat| {
            cat.loans
                .iter()
                .filter(|l| l.user_id == user_id && l.is_active())
                .cloned()
                .collect()
        })
    }

    /// Lists every loan ever created, terminal ones included.
    pub fn all(&self) -> Vec<Loan> {
        self.store.with_catalog(|cat| cat.loans.clone())
    }

    /// Transitions a pending loan to `InProgress`, fixing its
    /// days-remaining counter as of `today`.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - unknown loan id
    /// * `StoreError::AlreadyReturned` - the loan was already returned
    /// * `StoreError::Domain` - any other state than `Pending`
    pub fn start(&self, loan_id: i64, today: NaiveDate) -> StoreResult<Loan> {
        debug!(loan_id, "Starting loan");

        self.store.with_catalog_mut(|cat| {
            let loan = cat.loan_mut(loan_id).ok_or_else(|| StoreError::not_found("Loan", loan_id))?;
            if matches!(loan.status(), LoanStatus::Returned) {
                return Err(StoreError::AlreadyReturned { loan_id });
            }
            loan.start(today)?;
            Ok(loan.clone())
        })
    }

    /// Transitions a loan to the terminal `Error` state with a reason.
    pub fn mark_error(&self, loan_id: i64, message: &str) -> StoreResult<Loan> {
        debug!(loan_id, message, "Marking loan as failed");

        self.store.with_catalog_mut(|cat| {
            let loan = cat.loan_mut(loan_id).ok_or_else(|| StoreError::not_found("Loan", loan_id))?;
            loan.mark_error(message)?;
            Ok(loan.clone())
        })
    }

    /// Completes a return: marks the loan, releases the physical copy,
    /// and bumps the user's late-return counter when overdue.
    ///
    /// Calling this twice for the same loan fails with `AlreadyReturned`
    /// and performs no second release and no second counter bump.
    pub fn finalize_return(&self, loan_id: i64, today: NaiveDate) -> StoreResult<ReturnRecord> {
        debug!(loan_id, %today, "Finalizing return");

        let record = self.store.with_catalog_mut(|cat| {
            let loan = cat.loan_mut(loan_id).ok_or_else(|| StoreError::not_found("Loan", loan_id))?;
            if matches!(loan.status(), LoanStatus::Returned) {
                return Err(StoreError::AlreadyReturned { loan_id });
            }
            loan.mark_returned(today)?;

            let loan = loan.clone();
            let days_late = fine::days_late(loan.due_date, today);
            let fine = fine::fine_amount(days_late);

            if let Some(book) = cat.book_mut(loan.book_id) {
                book.release_copy();
            }
            if days_late > 0 {
                if let Some(user) = cat.user_mut(loan.user_id) {
                    user.record_late_return();
                }
            }

            Ok::<_, StoreError>(ReturnRecord {
                amount_due: loan.total_cost + fine,
                loan,
                days_late,
                fine,
            })
        })?;

        debug!(
            loan_id,
            days_late = record.days_late,
            fine = %record.fine,
            "Return finalized"
        );
        Ok(record)
    }

    /// Computes loan-wide counters and totals as of `today`.
    pub fn stats(&self, today: NaiveDate) -> LoanStats {
        self.store.with_catalog(|cat| LoanStats {
            total_loans: cat.loans.len(),
            active_loans: cat.loans.iter().filter(|l| l.is_active()).count(),
            overdue_loans: cat.loans.iter().filter(|l| l.is_overdue(today)).count(),
            total_amount: cat.loans.iter().map(|l| l.total_cost).sum(),
            total_fines: cat.loans.iter().map(|l| fine::loan_fine(l, today)).sum(),
        })
    }
}
