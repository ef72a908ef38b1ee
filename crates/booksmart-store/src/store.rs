//! # Catalog Store
//!
//! Shared in-memory state for the whole library: books, users and loans.
//!
//! ## Thread Safety
//! The catalog is wrapped in `Arc<Mutex<T>>` because:
//! 1. Repositories on different tasks access/modify the same catalog
//! 2. Check-then-act sequences (availability check + copy reservation)
//!    must observe a consistent snapshot
//! 3. The loan workflow can run concurrently
//!
//! ## Locking Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Store Operations                            │
//! │                                                                         │
//! │  Caller Action            Repository Call          Catalog Change       │
//! │  ─────────────            ───────────────          ──────────────       │
//! │                                                                         │
//! │  Register Book ─────────► books().insert() ─────► books.push(book)     │
//! │                                                                         │
//! │  Create Loan ───────────► loans().create() ─────► reserve + push       │
//! │                                                    (ONE lock hold)      │
//! │                                                                         │
//! │  Return Loan ───────────► loans().finalize_     ► mark + release +     │
//! │                           return()                 late counter         │
//! │                                                    (ONE lock hold)      │
//! │                                                                         │
//! │  Browse Catalog ────────► books().list() ───────► (read only)          │
//! │                                                                         │
//! │  NOTE: One Mutex guards books, users AND loans. Any sequence executed   │
//! │        inside a single with_catalog_mut closure is atomic; no other     │
//! │        task can observe or interleave a half-applied operation.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use booksmart_core::{Book, Loan, User};

/// The library catalog: every book, user and loan in the system.
///
/// ## Invariants
/// - Book ids are unique
/// - User emails are unique
/// - `next_loan_id` is greater than every loan id ever handed out
#[derive(Debug, Default)]
pub struct Catalog {
    /// Registered books.
    pub books: Vec<Book>,

    /// Registered users.
    pub users: Vec<User>,

    /// Every loan ever created, terminal ones included.
    pub loans: Vec<Loan>,

    /// Next loan id to hand out.
    next_loan_id: i64,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            books: Vec::new(),
            users: Vec::new(),
            loans: Vec::new(),
            next_loan_id: 1,
        }
    }

    /// Hands out the next loan id. Never reuses one.
    pub fn allocate_loan_id(&mut self) -> i64 {
        let id = self.next_loan_id;
        self.next_loan_id += 1;
        id
    }

    /// Finds a book by id.
    pub fn book(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// Finds a book by id, mutably.
    pub fn book_mut(&mut self, id: i64) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id() == id)
    }

    /// Finds a user by id.
    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Finds a user by id, mutably.
    pub fn user_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Finds a loan by id.
    pub fn loan(&self, id: i64) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    /// Finds a loan by id, mutably.
    pub fn loan_mut(&mut self, id: i64) -> Option<&mut Loan> {
        self.loans.iter_mut().find(|l| l.id == id)
    }
}

/// Shared handle to the catalog.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Catalog>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one thread modifies the catalog at a time
///
/// ## Why Not RwLock?
/// Catalog operations are quick, and the hot path (loan creation and
/// return) writes to several entities under one lock. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalog: Arc<Mutex<Catalog>>,
}

impl CatalogStore {
    /// Creates a store over an empty catalog.
    pub fn new() -> Self {
        CatalogStore {
            catalog: Arc::new(Mutex::new(Catalog::new())),
        }
    }

    /// Executes a function with read access to the catalog.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = store.with_catalog(|cat| cat.books.len());
    /// ```
    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.lock().expect("Catalog mutex poisoned");
        f(&catalog)
    }

    /// Executes a function with write access to the catalog.
    ///
    /// The closure runs under the lock; everything it does is one atomic
    /// step from the point of view of other tasks.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// store.with_catalog_mut(|cat| cat.books.push(book));
    /// ```
    pub fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        let mut catalog = self.catalog.lock().expect("Catalog mutex poisoned");
        f(&mut catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booksmart_core::Money;

    fn sample_book(id: i64) -> Book {
        Book::physical(
            id,
            "Estructuras de Datos",
            "Goodrich",
            "Programacion",
            2020,
            Money::from_pesos(12_990),
            7,
            3,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_loan_ids_are_sequential() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.allocate_loan_id(), 1);
        assert_eq!(catalog.allocate_loan_id(), 2);
        assert_eq!(catalog.allocate_loan_id(), 3);
    }

    #[test]
    fn test_store_handles_share_state() {
        let store = CatalogStore::new();
        let clone = store.clone();

        store.with_catalog_mut(|cat| cat.books.push(sample_book(1)));

        let seen = clone.with_catalog(|cat| cat.books.len());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_book_lookup_by_id() {
        let store = CatalogStore::new();
        store.with_catalog_mut(|cat| {
            cat.books.push(sample_book(1));
            cat.books.push(sample_book(2));
        });

        let title = store.with_catalog(|cat| cat.book(2).map(|b| b.title().to_string()));
        assert!(title.is_some());
        assert!(store.with_catalog(|cat| cat.book(99).is_none()));
    }
}
