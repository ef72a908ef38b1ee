//! # booksmart-core: Pure Business Logic for BookSmart
//!
//! This crate is the **heart** of BookSmart. It contains all business
//! rules as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       BookSmart Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (outside this workspace)              │   │
//! │  │        menus ──► prompts ──► currency formatting               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 booksmart-loans (service crate)                 │   │
//! │  │        create_loan, process_loan, return_loan, reports          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ booksmart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   fine    │  │   │
//! │  │   │ Book/User │  │   Money   │  │ discounts │  │ penalties │  │   │
//! │  │   │   Loan    │  │ floor math│  │  quotes   │  │ summaries │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO CLOCK READS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, User, Loan, statuses)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Per-category discount engine
//! - [`fine`] - Overdue penalty engine
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - "today" is an argument
//! 2. **No I/O**: store, clock and console access are FORBIDDEN here
//! 3. **Integer Money**: all amounts are whole pesos (i64), discounts floored
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use booksmart_core::money::Money;
//! use booksmart_core::pricing::quote;
//! use booksmart_core::types::UserCategory;
//!
//! // A student borrowing a $12.990 book
//! let q = quote(UserCategory::Student, Money::from_pesos(12990));
//!
//! assert_eq!(q.discount.pesos(), 1299);
//! assert_eq!(q.final_price.pesos(), 11691);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fine;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use booksmart_core::Money` instead of
// `use booksmart_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::DiscountRate;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Late returns at which a user loses borrowing rights
///
/// ## Business Reason
/// Three strikes: a user who returned three loans late must settle down
/// (or be explicitly reset by an administrator) before borrowing again.
pub const MAX_LATE_RETURNS: u32 = 3;

/// Maximum simultaneous active loans per user
pub const MAX_ACTIVE_LOANS: usize = 5;

/// Maximum loan period any book may configure, in days
pub const MAX_LOAN_DAYS: i64 = 30;

/// Maximum catalog price in pesos
pub const MAX_BOOK_PRICE: i64 = 100_000;

/// The administrator account email
///
/// ## Why a constant?
/// The admin is a fixed seed account in this teaching system; the email
/// doubles as the category discriminator for `UserCategory::Admin`.
pub const ADMIN_EMAIL: &str = "admin@booksmart.com";

/// Email suffix that marks a user as a student
pub const STUDENT_EMAIL_DOMAIN: &str = "@duocuc.cl";

/// Email suffix that marks a user as faculty
pub const FACULTY_EMAIL_DOMAIN: &str = "@duoc.cl";
