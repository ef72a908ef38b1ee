//! # booksmart-loans: Loan Workflow for BookSmart
//!
//! This crate drives loans through their lifecycle against the shared
//! catalog, and produces activity reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BookSmart Data Flow                              │
//! │                                                                         │
//! │  Caller (demo binary, tests, future API)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 booksmart-loans (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  LoanService  │    │  LoanReport   │    │    Clock     │  │   │
//! │  │   │ (service.rs)  │    │  (report.rs)  │    │  (clock.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ create/process│    │ counters      │    │ System or    │  │   │
//! │  │   │ return/quote  │    │ rankings      │    │ Fixed date   │  │   │
//! │  │   │ eligibility   │    │ fine stats    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  booksmart-store (repositories over the shared catalog)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - The loan lifecycle service
//! - [`report`] - Activity reports
//! - [`clock`] - Injectable date source
//! - [`error`] - Workflow error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use booksmart_loans::{Clock, LoanService};
//! use booksmart_store::seed;
//!
//! let store = seed::demo_store()?;
//! let service = LoanService::new(store);
//!
//! let loan = service.create_loan(3, 2).await?;
//! let loan = service.process_loan(loan.id).await?;
//! let record = service.return_loan(loan.id)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod report;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::Clock;
pub use error::{LoanError, LoanResult};
pub use report::{LoanReport, MostLoaned, UserFines};
pub use service::{CostQuote, Eligibility, LoanService, UserCosts, DEFAULT_PROCESSING_DELAY};
