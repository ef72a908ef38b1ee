//! # Repository Module
//!
//! Repository implementations over the shared catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts catalog access behind a clean API.   │
//! │                                                                         │
//! │  Loan Workflow                                                          │
//! │       │                                                                 │
//! │       │  books.find_by_title("kotlin")                                  │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BookRepository                                                         │
//! │  ├── find_by_title(&self, query)                                        │
//! │  ├── get(&self, id)                                                     │
//! │  ├── insert(&self, book)                                                │
//! │  └── reserve_copy(&self, id)                                            │
//! │       │                                                                 │
//! │       │  with_catalog / with_catalog_mut                                │
//! │       ▼                                                                 │
//! │  CatalogStore (Arc<Mutex<Catalog>>)                                     │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (build a store, wrap a repository)                     │
//! │  • Locking is isolated in one place                                    │
//! │  • Multi-entity sequences stay atomic                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Book CRUD, search and copy reservation
//! - [`user::UserRepository`] - User registration and authentication
//! - [`loan::LoanRepository`] - Loan records and atomic loan sequences

pub mod book;
pub mod loan;
pub mod user;
