//! # Loan Workflow Error Types
//!
//! Errors surfaced by the loan workflow. Each variant names the exact
//! precondition that failed, so callers can show a precise message
//! instead of a generic "loan failed".
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError / StoreError (lower layers)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LoanError (this module) ← Workflow categorization:                    │
//! │       │                     which step, which entity, which rule       │
//! │       ▼                                                                 │
//! │  Caller displays user-friendly message                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use booksmart_core::{CoreError, ValidationError};
use booksmart_store::StoreError;

/// Loan workflow errors.
#[derive(Debug, Error)]
pub enum LoanError {
    /// No book with this id exists in the catalog.
    #[error("Book {book_id} does not exist")]
    BookNotFound { book_id: i64 },

    /// No user with this id is registered.
    #[error("User {user_id} does not exist")]
    UserNotFound { user_id: i64 },

    /// No loan with this id was ever created.
    #[error("Loan {loan_id} does not exist")]
    LoanNotFound { loan_id: i64 },

    /// The user cannot borrow right now.
    ///
    /// ## When This Occurs
    /// - Too many late returns on record
    /// - Too many simultaneous active loans
    #[error("User {user_id} is not eligible to borrow: {reason}")]
    UserIneligible { user_id: i64, reason: String },

    /// The book cannot be loaned at all in its current state.
    #[error("Book {book_id} is not available for loan")]
    BookNotAvailable { book_id: i64 },

    /// Reference titles stay in the library.
    #[error("Book {book_id} is a reference title and cannot leave the library")]
    ReferenceBook { book_id: i64 },

    /// Every physical copy is currently out.
    #[error("Book {book_id} has no copies available")]
    NoCopiesAvailable { book_id: i64 },

    /// The copy reservation failed at the last moment.
    ///
    /// Distinct from [`LoanError::NoCopiesAvailable`]: the book looked
    /// available when checked, but another loan took the last copy first.
    #[error("Could not reserve a copy of book {book_id}")]
    ReservationFailed { book_id: i64 },

    /// The loan was already returned.
    #[error("Loan {loan_id} has already been returned")]
    AlreadyReturned { loan_id: i64 },

    /// The loan is in a state that does not allow the requested step.
    #[error("Loan {loan_id} is {status}, cannot proceed")]
    InvalidState { loan_id: i64, status: String },

    /// A field value was rejected before the workflow ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Translate storage errors into workflow terms.
///
/// ## Error Mapping
/// ```text
/// NotFound("Book"/"User"/"Loan")  → the matching *NotFound variant
/// AlreadyReturned                 → AlreadyReturned
/// Domain(BookNotLoanable)         → BookNotAvailable
/// Domain(CopyUnavailable)         → ReservationFailed (race lost)
/// Domain(IneligibleUser)          → UserIneligible
/// Domain(InvalidTransition)       → InvalidState
/// ```
impl From<StoreError> for LoanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                let id = id.parse().unwrap_or_default();
                match entity.as_str() {
                    "Book" => LoanError::BookNotFound { book_id: id },
                    "User" => LoanError::UserNotFound { user_id: id },
                    _ => LoanError::LoanNotFound { loan_id: id },
                }
            }

            StoreError::Duplicate { field, value } => {
                LoanError::Validation(ValidationError::Duplicate { field, value })
            }

            StoreError::AlreadyReturned { loan_id } => LoanError::AlreadyReturned { loan_id },

            StoreError::Domain(core) => match core {
                CoreError::BookNotLoanable { book_id } => LoanError::BookNotAvailable { book_id },
                CoreError::CopyUnavailable { book_id } => LoanError::ReservationFailed { book_id },
                CoreError::IneligibleUser { user_id } => LoanError::UserIneligible {
                    user_id,
                    reason: "borrowing limit reached".to_string(),
                },
                CoreError::InvalidTransition { loan_id, status } => {
                    LoanError::InvalidState { loan_id, status }
                }
                CoreError::Validation(v) => LoanError::Validation(v),
            },
        }
    }
}

/// Result type for loan workflow operations.
pub type LoanResult<T> = Result<T, LoanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_by_entity() {
        let err = LoanError::from(StoreError::not_found("Book", 7));
        assert!(matches!(err, LoanError::BookNotFound { book_id: 7 }));

        let err = LoanError::from(StoreError::not_found("User", 2));
        assert!(matches!(err, LoanError::UserNotFound { user_id: 2 }));

        let err = LoanError::from(StoreError::not_found("Loan", 5));
        assert!(matches!(err, LoanError::LoanNotFound { loan_id: 5 }));
    }

    #[test]
    fn test_copy_race_maps_to_reservation_failed() {
        let err = LoanError::from(StoreError::Domain(CoreError::CopyUnavailable { book_id: 1 }));
        assert!(matches!(err, LoanError::ReservationFailed { book_id: 1 }));
    }

    #[test]
    fn test_messages_name_the_entity() {
        let err = LoanError::ReferenceBook { book_id: 2 };
        assert_eq!(
            err.to_string(),
            "Book 2 is a reference title and cannot leave the library"
        );
    }
}
