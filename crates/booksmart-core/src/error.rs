//! # Error Types
//!
//! Domain-specific error types for booksmart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  booksmart-core errors (this file)                                     │
//! │  ├── CoreError        - Domain construction / rule errors              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  booksmart-store errors (separate crate)                               │
//! │  └── StoreError       - Catalog store failures (not found, duplicate)  │
//! │                                                                         │
//! │  booksmart-loans errors (separate crate)                               │
//! │  └── LoanError        - Loan lifecycle taxonomy the caller handles     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → LoanError → Caller   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, value)
//! 3. Errors are enum variants, never String
//! 4. Every failure is recoverable: the core never panics on bad input

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent domain rule violations raised while constructing
/// or mutating domain values. They should be caught and translated to
/// user-friendly messages by the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A loan state transition was requested that the current state
    /// does not allow.
    ///
    /// ## When This Occurs
    /// - Processing a loan that is already `Returned` or `Error`
    /// - Returning a loan twice
    /// - Starting a loan that is already in progress
    #[error("Loan {loan_id} is {status}, cannot transition")]
    InvalidTransition { loan_id: i64, status: String },

    /// A physical copy operation could not be applied.
    ///
    /// ## When This Occurs
    /// - Reserving a copy of a book with none available
    /// - Reserving a copy of a reference book
    #[error("No copy of book {book_id} could be reserved")]
    CopyUnavailable { book_id: i64 },

    /// A loan was constructed against a book that is not loanable.
    ///
    /// ## When This Occurs
    /// - Loan period is zero (reference books)
    /// - Physical book with no available copies
    #[error("Book {book_id} is not loanable")]
    BookNotLoanable { book_id: i64 },

    /// A loan was constructed for a user who cannot borrow.
    ///
    /// ## When This Occurs
    /// - The user has reached the late-return limit
    #[error("User {user_id} is not eligible to borrow")]
    IneligibleUser { user_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a field value doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate book id, duplicate email).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
