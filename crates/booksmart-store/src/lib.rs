//! # booksmart-store: Catalog Storage Layer for BookSmart
//!
//! This crate provides shared catalog storage for the BookSmart system.
//! Everything lives in memory behind a single Mutex; there is no
//! external database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BookSmart Data Flow                              │
//! │                                                                         │
//! │  Loan Workflow (booksmart-loans)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  booksmart-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CatalogStore  │    │  Repositories │    │  Seed Data   │  │   │
//! │  │   │  (store.rs)   │    │  (book.rs …)  │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Arc<Mutex<    │◄───│ BookRepo      │    │ 5 books      │  │   │
//! │  │   │   Catalog>>   │    │ UserRepo      │    │ 4 users      │  │   │
//! │  │   │               │    │ LoanRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  booksmart-core (pure domain types and rules)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The shared catalog and its Mutex handle
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (book, user, loan)
//! - [`seed`] - Demo catalog data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use booksmart_store::{seed, BookRepository, LoanRepository};
//!
//! let store = seed::demo_store()?;
//! let books = BookRepository::new(store.clone());
//! let loans = LoanRepository::new(store.clone());
//!
//! let hits = books.find_by_title("kotlin");
//! let loan = loans.create(hits[0].id(), 2, today)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Catalog, CatalogStore};

// Repository re-exports for convenience
pub use repository::book::{Availability, BookOrder, BookRepository, BookSearch, CatalogStats};
pub use repository::loan::{LoanRepository, LoanStats, ReturnRecord};
pub use repository::user::UserRepository;
