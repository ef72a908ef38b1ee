//! # Store Error Types
//!
//! Error types for catalog storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Domain Error (booksmart_core::CoreError)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds entity context (which id, which field)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LoanError (in booksmart-loans) ← Workflow-level categorization        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller displays user-friendly message                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use booksmart_core::CoreError;

/// Catalog storage errors.
///
/// These errors wrap domain errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the catalog.
    ///
    /// ## When This Occurs
    /// - Looking up a book, user or loan by an id that doesn't exist
    /// - The entity was removed
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a book with an id already in the catalog
    /// - Registering a user with an email already taken
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A return was requested for a loan that is already returned.
    ///
    /// Kept separate from other transition failures so callers can
    /// treat the double-return case idempotently.
    #[error("Loan {loan_id} has already been returned")]
    AlreadyReturned { loan_id: i64 },

    /// A domain rule rejected the operation.
    ///
    /// ## When This Occurs
    /// - Reserving a copy with none available (lost a race)
    /// - Creating a loan for a reference book or an ineligible user
    /// - An invalid loan state transition
    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
