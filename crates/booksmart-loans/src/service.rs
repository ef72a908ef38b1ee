//! # Loan Service
//!
//! Orchestrates the loan lifecycle against the shared catalog.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Loan Lifecycle                                   │
//! │                                                                         │
//! │  create_loan(book, user)                                               │
//! │       │  eligibility + availability checks, price frozen               │
//! │       ▼                                                                 │
//! │   [Pending] ──── process_loan ────► [InProgress(days_remaining)]       │
//! │       │                                   │                             │
//! │       │                                   │  return_loan                │
//! │       │                                   ▼                             │
//! │       │ (processing failure)         [Returned]  ← terminal             │
//! │       ▼                                                                 │
//! │   [Error(reason)]  ← terminal                                           │
//! │                                                                         │
//! │  Both async steps sleep for the configured processing delay before     │
//! │  touching the catalog; tests set the delay to zero.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use booksmart_core::pricing::DiscountQuote;
use booksmart_core::{
    fine, pricing, validation, Book, Loan, Money, User, MAX_ACTIVE_LOANS, MAX_LATE_RETURNS,
};
use booksmart_store::{
    BookRepository, CatalogStore, LoanRepository, ReturnRecord, StoreError, UserRepository,
};

use crate::clock::Clock;
use crate::error::{LoanError, LoanResult};

/// Default simulated processing time for the async lifecycle steps.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(500);

/// Result of an eligibility check.
///
/// `reasons` lists every failed condition, not just the first, so the
/// caller can show the complete picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub user_id: i64,
    pub allowed: bool,
    pub reasons: Vec<String>,
    pub active_loans: usize,
    pub overdue_loans: usize,
}

/// Cost simulation for a loan that has not been created yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostQuote {
    pub book_id: i64,
    pub title: String,
    pub loan_days: i64,
    #[serde(flatten)]
    pub quote: DiscountQuote,
}

/// A user's full position: loan costs plus accumulated fines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCosts {
    pub user_id: i64,
    pub loan_count: usize,
    pub overdue_count: usize,
    pub loan_cost: Money,
    pub fines: Money,
    pub total: Money,
}

/// Drives loans through their lifecycle.
///
/// ## Usage
/// ```rust,ignore
/// let service = LoanService::new(store).with_clock(Clock::Fixed(today));
///
/// let loan = service.create_loan(3, 2).await?;
/// let loan = service.process_loan(loan.id).await?;
/// let record = service.return_loan(loan.id)?;
/// ```
#[derive(Debug, Clone)]
pub struct LoanService {
    books: BookRepository,
    users: UserRepository,
    loans: LoanRepository,
    clock: Clock,
    processing_delay: Duration,
}

impl LoanService {
    /// Creates a service over a catalog store, with the system clock and
    /// the default processing delay.
    pub fn new(store: CatalogStore) -> Self {
        LoanService {
            books: BookRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            loans: LoanRepository::new(store),
            clock: Clock::System,
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }

    /// Replaces the clock. Tests pin a fixed date here.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the simulated processing delay. Tests pass zero.
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// The repositories this service is built on, for callers that need
    /// direct catalog access.
    pub fn books(&self) -> &BookRepository {
        &self.books
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn loans(&self) -> &LoanRepository {
        &self.loans
    }

    /// The date the service considers "today".
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates a loan for a user, reserving a physical copy.
    ///
    /// ## Checks, in order
    /// 1. Both ids are positive
    /// 2. User exists and is eligible (late returns, active-loan limit)
    /// 3. Book exists and is loanable (reference, copies)
    /// 4. Atomic reserve-and-persist; losing a race for the last copy
    ///    fails with [`LoanError::ReservationFailed`]
    pub async fn create_loan(&self, book_id: i64, user_id: i64) -> LoanResult<Loan> {
        validation::validate_book_id(book_id)?;
        validation::validate_user_id(user_id)?;

        info!(book_id, user_id, "Loan requested");

        let user = self
            .users
            .get(user_id)
            .ok_or(LoanError::UserNotFound { user_id })?;
        self.check_eligible(&user)?;

        let book = self
            .books
            .get(book_id)
            .ok_or(LoanError::BookNotFound { book_id })?;
        self.check_loanable(&book)?;

        // Simulated processing time. The atomic reserve inside `create`
        // covers the window this sleep opens: losing the last copy here
        // surfaces as ReservationFailed, not as a stale success.
        tokio::time::sleep(self.processing_delay).await;

        let loan = self.loans.create(book_id, user_id, self.clock.today())?;

        info!(
            loan_id = loan.id,
            due = %loan.due_date,
            total = %loan.total_cost,
            "Loan created"
        );
        Ok(loan)
    }

    /// Processes a pending loan, activating it.
    ///
    /// On a state conflict the loan is pushed to `Error(reason)` when the
    /// current state still allows it, and the conflict is returned.
    pub async fn process_loan(&self, loan_id: i64) -> LoanResult<Loan> {
        debug!(loan_id, "Processing loan");

        tokio::time::sleep(self.processing_delay).await;

        match self.loans.start(loan_id, self.clock.today()) {
            Ok(loan) => {
                info!(loan_id, status = %loan.status(), "Loan activated");
                Ok(loan)
            }
            Err(StoreError::AlreadyReturned { loan_id }) => {
                Err(LoanError::AlreadyReturned { loan_id })
            }
            Err(err @ StoreError::NotFound { .. }) => Err(err.into()),
            Err(err) => {
                warn!(loan_id, error = %err, "Processing failed, marking loan");
                // Only non-terminal loans can still take the Error state.
                let _ = self
                    .loans
                    .mark_error(loan_id, &format!("processing failed: {err}"));
                Err(err.into())
            }
        }
    }

    /// Returns a borrowed book, computing fines as of today.
    ///
    /// Returning the same loan twice fails with
    /// [`LoanError::AlreadyReturned`] without releasing a second copy or
    /// bumping the late counter again.
    pub fn return_loan(&self, loan_id: i64) -> LoanResult<ReturnRecord> {
        let record = self.loans.finalize_return(loan_id, self.clock.today())?;

        info!(
            loan_id,
            days_late = record.days_late,
            fine = %record.fine,
            amount_due = %record.amount_due,
            "Book returned"
        );
        Ok(record)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks whether a user may take another loan, listing every reason
    /// they may not.
    pub fn eligibility(&self, user_id: i64) -> LoanResult<Eligibility> {
        let user = self
            .users
            .get(user_id)
            .ok_or(LoanError::UserNotFound { user_id })?;

        let today = self.clock.today();
        let active = self.loans.active_for_user(user_id);
        // Only loans still out count here; a late return is already
        // captured by the user's late-return counter.
        let overdue = active.iter().filter(|l| l.is_overdue(today)).count();

        let mut reasons = Vec::new();
        if !user.can_borrow() {
            reasons.push(format!(
                "late-return limit reached ({} of {})",
                user.late_returns(),
                MAX_LATE_RETURNS
            ));
        }
        if overdue >= MAX_LATE_RETURNS as usize {
            reasons.push(format!("{overdue} loans are overdue and unreturned"));
        }
        if active.len() >= MAX_ACTIVE_LOANS {
            reasons.push(format!(
                "active-loan limit reached ({} of {})",
                active.len(),
                MAX_ACTIVE_LOANS
            ));
        }

        Ok(Eligibility {
            user_id,
            allowed: reasons.is_empty(),
            reasons,
            active_loans: active.len(),
            overdue_loans: overdue,
        })
    }

    /// Simulates the cost of a loan without creating it.
    pub fn quote(&self, book_id: i64, user_id: i64) -> LoanResult<CostQuote> {
        let book = self
            .books
            .get(book_id)
            .ok_or(LoanError::BookNotFound { book_id })?;
        let user = self
            .users
            .get(user_id)
            .ok_or(LoanError::UserNotFound { user_id })?;

        Ok(CostQuote {
            book_id,
            title: book.title().to_string(),
            loan_days: book.loan_days(),
            quote: pricing::quote(user.category, book.base_price()),
        })
    }

    /// Every loan a user ever took, oldest first.
    pub fn user_loans(&self, user_id: i64) -> LoanResult<Vec<Loan>> {
        validation::validate_user_id(user_id)?;
        Ok(self.loans.by_user(user_id))
    }

    /// A user's currently overdue loans.
    pub fn overdue_loans(&self, user_id: i64) -> LoanResult<Vec<Loan>> {
        let today = self.clock.today();
        Ok(self
            .user_loans(user_id)?
            .into_iter()
            .filter(|l| l.is_overdue(today))
            .collect())
    }

    /// A user's full position: loan costs, fines, and the grand total.
    pub fn user_costs(&self, user_id: i64) -> LoanResult<UserCosts> {
        let loans = self.user_loans(user_id)?;
        let today = self.clock.today();
        let summary = fine::FineSummary::for_loans(&loans, today);

        Ok(UserCosts {
            user_id,
            loan_count: loans.len(),
            overdue_count: summary.overdue_count,
            loan_cost: loans.iter().map(|l| l.total_cost).sum(),
            fines: summary.total_fines,
            total: summary.total_with_fines,
        })
    }

    /// How much a user has saved through category discounts.
    pub fn user_savings(&self, user_id: i64) -> LoanResult<pricing::Savings> {
        let loans = self.user_loans(user_id)?;
        Ok(pricing::accumulated_savings(&loans))
    }

    /// A snapshot report over all loan activity as of today.
    pub fn report(&self) -> crate::report::LoanReport {
        crate::report::LoanReport::generate(&self.books, &self.users, &self.loans, self.clock.today())
    }

    fn check_eligible(&self, user: &User) -> LoanResult<()> {
        let eligibility = self.eligibility(user.id)?;
        if eligibility.allowed {
            Ok(())
        } else {
            warn!(user_id = user.id, reasons = ?eligibility.reasons, "User ineligible");
            Err(LoanError::UserIneligible {
                user_id: user.id,
                reason: eligibility.reasons.join("; "),
            })
        }
    }

    /// Distinguishes the three ways a book can be unavailable, so the
    /// caller sees the precise one.
    fn check_loanable(&self, book: &Book) -> LoanResult<()> {
        if book.is_reference() {
            return Err(LoanError::ReferenceBook { book_id: book.id() });
        }
        if let Some(physical) = book.as_physical() {
            if physical.available_copies() == 0 {
                return Err(LoanError::NoCopiesAvailable { book_id: book.id() });
            }
        }
        if !book.is_loanable() {
            return Err(LoanError::BookNotAvailable { book_id: book.id() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booksmart_store::seed;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> LoanService {
        let store = seed::demo_store().unwrap();
        LoanService::new(store)
            .with_clock(Clock::Fixed(date(2026, 3, 2)))
            .with_processing_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_student_discount_is_applied() {
        let service = service();

        // Book 1: $12.990 physical. User 2: student (10%).
        let loan = service.create_loan(1, 2).await.unwrap();
        assert_eq!(loan.base_price, Money::from_pesos(12_990));
        assert_eq!(loan.discount, Money::from_pesos(1_299));
        assert_eq!(loan.total_cost, Money::from_pesos(11_691));
        assert_eq!(loan.due_date, date(2026, 3, 9));
    }

    #[tokio::test]
    async fn test_reference_book_is_refused() {
        let service = service();
        let err = service.create_loan(2, 2).await.unwrap_err();
        assert!(matches!(err, LoanError::ReferenceBook { book_id: 2 }));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_named() {
        let service = service();
        assert!(matches!(
            service.create_loan(99, 2).await.unwrap_err(),
            LoanError::BookNotFound { book_id: 99 }
        ));
        assert!(matches!(
            service.create_loan(1, 99).await.unwrap_err(),
            LoanError::UserNotFound { user_id: 99 }
        ));
    }

    #[tokio::test]
    async fn test_copy_exhaustion_surfaces_no_copies() {
        let service = service();

        // Book 5 has two copies; users 2, 3 take them.
        service.create_loan(5, 2).await.unwrap();
        service.create_loan(5, 3).await.unwrap();

        let err = service.create_loan(5, 4).await.unwrap_err();
        assert!(matches!(err, LoanError::NoCopiesAvailable { book_id: 5 }));
    }

    #[tokio::test]
    async fn test_digital_copies_never_deplete() {
        let service = service();

        for user_id in [2, 3, 4] {
            service.create_loan(3, user_id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_active_loan_limit_blocks_sixth_loan() {
        let service = service();

        // Two physical + digital loans up to the limit of five.
        service.create_loan(1, 2).await.unwrap();
        service.create_loan(5, 2).await.unwrap();
        service.create_loan(3, 2).await.unwrap();
        service.create_loan(4, 2).await.unwrap();
        // Digital books can be borrowed once more under a new loan id.
        service.create_loan(3, 2).await.unwrap();

        let err = service.create_loan(4, 2).await.unwrap_err();
        assert!(matches!(err, LoanError::UserIneligible { user_id: 2, .. }));

        let eligibility = service.eligibility(2).unwrap();
        assert!(!eligibility.allowed);
        assert_eq!(eligibility.active_loans, 5);
    }

    #[tokio::test]
    async fn test_lifecycle_pending_to_returned() {
        let service = service();

        let loan = service.create_loan(1, 2).await.unwrap();
        let loan = service.process_loan(loan.id).await.unwrap();
        assert!(loan.is_active());

        let record = service.return_loan(loan.id).unwrap();
        assert_eq!(record.days_late, 0);
        assert!(record.fine.is_zero());

        // A second return is refused.
        let err = service.return_loan(loan.id).unwrap_err();
        assert!(matches!(err, LoanError::AlreadyReturned { .. }));
    }

    #[tokio::test]
    async fn test_processing_a_returned_loan_fails() {
        let service = service();

        let loan = service.create_loan(1, 2).await.unwrap();
        service.return_loan(loan.id).unwrap();

        let err = service.process_loan(loan.id).await.unwrap_err();
        assert!(matches!(err, LoanError::AlreadyReturned { .. }));
    }

    #[tokio::test]
    async fn test_quote_matches_created_loan() {
        let service = service();

        let quote = service.quote(4, 3).unwrap();
        // Faculty: 15% of $11.990 = $1.798 (floor).
        assert_eq!(quote.quote.discount, Money::from_pesos(1_798));
        assert_eq!(quote.quote.final_price, Money::from_pesos(10_192));

        let loan = service.create_loan(4, 3).await.unwrap();
        assert_eq!(loan.total_cost, quote.quote.final_price);
    }

    #[tokio::test]
    async fn test_user_costs_include_fines() {
        let store = seed::demo_store().unwrap();
        let service = LoanService::new(store.clone())
            .with_clock(Clock::Fixed(date(2026, 3, 2)))
            .with_processing_delay(Duration::ZERO);

        let loan = service.create_loan(1, 2).await.unwrap();

        // Jump a week past the due date.
        let later = LoanService::new(store)
            .with_clock(Clock::Fixed(date(2026, 3, 16)))
            .with_processing_delay(Duration::ZERO);

        let costs = later.user_costs(2).unwrap();
        assert_eq!(costs.loan_count, 1);
        assert_eq!(costs.overdue_count, 1);
        assert_eq!(costs.loan_cost, loan.total_cost);
        assert_eq!(costs.fines, Money::from_pesos(700));
        assert_eq!(costs.total, loan.total_cost + Money::from_pesos(700));
    }

    #[tokio::test]
    async fn test_external_user_gets_no_discount() {
        let service = service();
        let loan = service.create_loan(1, 4).await.unwrap();
        assert!(loan.discount.is_zero());
        assert_eq!(loan.total_cost, loan.base_price);
    }
}
