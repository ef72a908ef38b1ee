//! # Book Repository
//!
//! Catalog operations for books.
//!
//! ## Key Operations
//! - Case-insensitive search by title and author
//! - CRUD operations
//! - Copy reservation for physical books
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Works                             │
//! │                                                                         │
//! │  User types: "kotlin"                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Lowercased substring match against book titles                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ catalog.books                           │                           │
//! │  │                                         │                           │
//! │  │ 3 | Programacion en Kotlin  | JetBrains│ ← MATCH!                  │
//! │  │ 4 | Algoritmos Basicos      | Cormen   │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [Programacion en Kotlin]                                     │
//! │                                                                         │
//! │  Category filtering is an exact case-insensitive match instead,        │
//! │  because categories are short labels, not free text.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::CatalogStore;
use booksmart_core::{Book, Money};

/// Catalog-wide counters and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_books: usize,
    pub available_books: usize,
    pub catalog_value: Money,
    pub physical_books: usize,
    pub digital_books: usize,
    pub reference_books: usize,
}

/// Multi-criteria catalog search. Every field is optional; a book must
/// satisfy all the populated ones at once.
///
/// ## Usage
/// ```rust,ignore
/// let hits = repo.search(&BookSearch {
///     category: Some("Programacion".into()),
///     year_from: Some(2022),
///     only_available: true,
///     ..BookSearch::default()
/// });
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookSearch {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Case-insensitive author substring.
    pub author: Option<String>,
    /// Case-insensitive exact category.
    pub category: Option<String>,
    /// Earliest publication year, inclusive.
    pub year_from: Option<i32>,
    /// Latest publication year, inclusive.
    pub year_to: Option<i32>,
    /// Keep only books that are loanable right now.
    pub only_available: bool,
}

impl BookSearch {
    fn matches(&self, book: &Book) -> bool {
        if let Some(title) = &self.title {
            if !book.title().to_lowercase().contains(&title.trim().to_lowercase()) {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if !book.author().to_lowercase().contains(&author.trim().to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if book.category().to_lowercase() != category.trim().to_lowercase() {
                return false;
            }
        }
        let year = book.details().year;
        if self.year_from.is_some_and(|from| year < from) {
            return false;
        }
        if self.year_to.is_some_and(|to| year > to) {
            return false;
        }
        if self.only_available && !book.is_loanable() {
            return false;
        }
        true
    }
}

/// Sort key for ordered catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookOrder {
    Title,
    Author,
    Year,
    Price,
}

/// Why a book can or cannot be borrowed right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    /// Physical, loanable, with `copies` free right now.
    Available { copies: u32 },
    /// Digital and loanable; never depletes.
    Digital,
    /// Reference-only title, never leaves the library.
    Reference,
    /// Physical and loanable in principle, but every copy is out.
    NoCopies,
    /// Loan period is zero without being flagged as reference.
    NotLoanable,
}

/// Repository for book catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(store.clone());
///
/// // Search books
/// let results = repo.find_by_title("kotlin");
///
/// // Get by id
/// let book = repo.get(3);
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    store: CatalogStore,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(store: CatalogStore) -> Self {
        BookRepository { store }
    }

    /// Registers a book in the catalog.
    ///
    /// ## Errors
    /// * `StoreError::Duplicate` - a book with the same id already exists
    pub fn insert(&self, book: Book) -> StoreResult<()> {
        let id = book.id();
        debug!(book_id = id, title = %book.title(), "Registering book");

        self.store.with_catalog_mut(|cat| {
            if cat.book(id).is_some() {
                return Err(StoreError::duplicate("book id", id.to_string()));
            }
            cat.books.push(book);
            Ok(())
        })
    }

    /// Gets a book by its id.
    ///
    /// ## Returns
    /// * `Some(Book)` - Book found (a snapshot copy)
    /// * `None` - Book not found
    pub fn get(&self, id: i64) -> Option<Book> {
        self.store.with_catalog(|cat| cat.book(id).cloned())
    }

    /// Lists every book in the catalog.
    pub fn list(&self) -> Vec<Book> {
        self.store.with_catalog(|cat| cat.books.clone())
    }

    /// Removes a book from the catalog.
    ///
    /// ## Returns
    /// `true` if a book was removed, `false` if the id was unknown.
    pub fn remove(&self, id: i64) -> bool {
        debug!(book_id = id, "Removing book");
        self.store.with_catalog_mut(|cat| {
            let before = cat.books.len();
            cat.books.retain(|b| b.id() != id);
            cat.books.len() != before
        })
    }

    /// Searches books whose title contains `query`, case-insensitively.
    pub fn find_by_title(&self, query: &str) -> Vec<Book> {
        let needle = query.trim().to_lowercase();
        debug!(query = %needle, "Searching books by title");

        let books = self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| b.title().to_lowercase().contains(&needle))
                .cloned()
                .collect::<Vec<_>>()
        });

        debug!(count = books.len(), "Title search returned books");
        books
    }

    /// Searches books whose author contains `query`, case-insensitively.
    pub fn find_by_author(&self, query: &str) -> Vec<Book> {
        let needle = query.trim().to_lowercase();
        debug!(query = %needle, "Searching books by author");

        self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| b.author().to_lowercase().contains(&needle))
                .cloned()
                .collect()
        })
    }

    /// Filters books by exact category, case-insensitively.
    pub fn filter_by_category(&self, category: &str) -> Vec<Book> {
        let wanted = category.trim().to_lowercase();
        self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| b.category().to_lowercase() == wanted)
                .cloned()
                .collect()
        })
    }

    /// Lists books currently loanable: digital titles, plus physical
    /// non-reference titles with at least one free copy.
    pub fn available(&self) -> Vec<Book> {
        self.store.with_catalog(|cat| {
            cat.books.iter().filter(|b| b.is_loanable()).cloned().collect()
        })
    }

    /// Lists physical books with at least one free copy.
    pub fn physical_available(&self) -> Vec<Book> {
        self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| b.is_physical() && b.is_loanable())
                .cloned()
                .collect()
        })
    }

    /// Lists digital books.
    pub fn digital(&self) -> Vec<Book> {
        self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| !b.is_physical())
                .cloned()
                .collect()
        })
    }

    /// Distinct categories in the catalog, sorted alphabetically.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.store.with_catalog(|cat| {
            cat.books.iter().map(|b| b.category().to_string()).collect()
        });
        categories.sort();
        categories.dedup();
        categories
    }

    /// Distinct authors in the catalog, sorted alphabetically.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = self.store.with_catalog(|cat| {
            cat.books.iter().map(|b| b.author().to_string()).collect()
        });
        authors.sort();
        authors.dedup();
        authors
    }

    /// Searches books against several criteria at once.
    pub fn search(&self, criteria: &BookSearch) -> Vec<Book> {
        debug!(?criteria, "Multi-criteria search");
        self.store.with_catalog(|cat| {
            cat.books
                .iter()
                .filter(|b| criteria.matches(b))
                .cloned()
                .collect()
        })
    }

    /// Lists every book sorted by the given key. Ties keep insertion order.
    pub fn list_ordered(&self, order: BookOrder) -> Vec<Book> {
        let mut books = self.list();
        match order {
            BookOrder::Title => books.sort_by(|a, b| a.title().cmp(b.title())),
            BookOrder::Author => books.sort_by(|a, b| a.author().cmp(b.author())),
            BookOrder::Year => books.sort_by_key(|b| b.details().year),
            BookOrder::Price => books.sort_by_key(|b| b.base_price()),
        }
        books
    }

    /// Explains whether a book can be borrowed right now and why not.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - unknown book id
    pub fn availability(&self, id: i64) -> StoreResult<Availability> {
        self.store.with_catalog(|cat| {
            let book = cat.book(id).ok_or_else(|| StoreError::not_found("Book", id))?;
            let availability = match book {
                Book::Digital(d) if d.details().loan_days > 0 => Availability::Digital,
                Book::Digital(_) => Availability::NotLoanable,
                Book::Physical(p) if p.reference => Availability::Reference,
                Book::Physical(p) if p.details().loan_days == 0 => Availability::NotLoanable,
                Book::Physical(p) if p.available_copies() == 0 => Availability::NoCopies,
                Book::Physical(p) => Availability::Available {
                    copies: p.available_copies(),
                },
            };
            Ok(availability)
        })
    }

    /// Suggests up to `limit` loanable books sharing a category with the
    /// given book, excluding the book itself.
    pub fn recommendations(&self, book_id: i64, limit: usize) -> Vec<Book> {
        self.store.with_catalog(|cat| {
            let category = match cat.book(book_id) {
                Some(book) => book.category().to_lowercase(),
                None => return Vec::new(),
            };

            cat.books
                .iter()
                .filter(|b| {
                    b.id() != book_id
                        && b.is_loanable()
                        && b.category().to_lowercase() == category
                })
                .take(limit)
                .cloned()
                .collect()
        })
    }

    /// Reserves one physical copy of a book.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - unknown book id
    /// * `StoreError::Domain(CopyUnavailable)` - no free copy, or the
    ///   book is a reference title
    pub fn reserve_copy(&self, id: i64) -> StoreResult<()> {
        debug!(book_id = id, "Reserving copy");
        self.store.with_catalog_mut(|cat| {
            let book = cat.book_mut(id).ok_or_else(|| StoreError::not_found("Book", id))?;
            book.reserve_copy()?;
            Ok(())
        })
    }

    /// Releases one physical copy of a book. No-op for digital titles;
    /// never exceeds the total copy count.
    pub fn release_copy(&self, id: i64) -> StoreResult<()> {
        debug!(book_id = id, "Releasing copy");
        self.store.with_catalog_mut(|cat| {
            let book = cat.book_mut(id).ok_or_else(|| StoreError::not_found("Book", id))?;
            book.release_copy();
            Ok(())
        })
    }

    /// Computes catalog-wide counters and totals.
    pub fn stats(&self) -> CatalogStats {
        self.store.with_catalog(|cat| CatalogStats {
            total_books: cat.books.len(),
            available_books: cat.books.iter().filter(|b| b.is_loanable()).count(),
            catalog_value: cat.books.iter().map(|b| b.base_price()).sum(),
            physical_books: cat.books.iter().filter(|b| b.is_physical()).count(),
            digital_books: cat.books.iter().filter(|b| !b.is_physical()).count(),
            reference_books: cat.books.iter().filter(|b| b.is_reference()).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booksmart_core::FileFormat;

    fn repo_with_catalog() -> BookRepository {
        let store = CatalogStore::new();
        let repo = BookRepository::new(store);

        repo.insert(
            Book::physical(
                1,
                "Estructuras de Datos",
                "Goodrich",
                "Programacion",
                2020,
                Money::from_pesos(12_990),
                7,
                3,
                false,
            )
            .unwrap(),
        )
        .unwrap();

        repo.insert(
            Book::physical(
                2,
                "Diccionario Enciclopedico",
                "Varios",
                "Referencia",
                2019,
                Money::from_pesos(15_990),
                0,
                1,
                true,
            )
            .unwrap(),
        )
        .unwrap();

        repo.insert(
            Book::digital(
                3,
                "Programacion en Kotlin",
                "JetBrains",
                "Programacion",
                2023,
                Money::from_pesos(9_990),
                10,
                true,
                FileFormat::Pdf,
                15.5,
            )
            .unwrap(),
        )
        .unwrap();

        repo
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let repo = repo_with_catalog();
        let dup = Book::digital(
            3,
            "Otro Libro",
            "Alguien",
            "Programacion",
            2021,
            Money::from_pesos(5_000),
            10,
            false,
            FileFormat::Epub,
            1.0,
        )
        .unwrap();

        let err = repo.insert(dup).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(repo.list().len(), 3);
    }

    #[test]
    fn test_title_search_is_case_insensitive() {
        let repo = repo_with_catalog();
        let hits = repo.find_by_title("KOTLIN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), 3);
    }

    #[test]
    fn test_category_filter_is_exact_match() {
        let repo = repo_with_catalog();
        assert_eq!(repo.filter_by_category("programacion").len(), 2);
        // Substring of a category must not match.
        assert!(repo.filter_by_category("program").is_empty());
    }

    #[test]
    fn test_available_excludes_reference_books() {
        let repo = repo_with_catalog();
        let available = repo.available();
        assert_eq!(available.len(), 2);
        assert!(available.iter().all(|b| b.id() != 2));
    }

    #[test]
    fn test_reserve_copy_exhausts_stock() {
        let repo = repo_with_catalog();
        for _ in 0..3 {
            repo.reserve_copy(1).unwrap();
        }
        let err = repo.reserve_copy(1).unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));

        // Releasing frees a copy again.
        repo.release_copy(1).unwrap();
        repo.reserve_copy(1).unwrap();
    }

    #[test]
    fn test_recommendations_share_category() {
        let repo = repo_with_catalog();
        let recs = repo.recommendations(1, 5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id(), 3);
    }

    #[test]
    fn test_stats_counts_every_kind() {
        let repo = repo_with_catalog();
        let stats = repo.stats();
        assert_eq!(stats.total_books, 3);
        assert_eq!(stats.available_books, 2);
        assert_eq!(stats.physical_books, 2);
        assert_eq!(stats.digital_books, 1);
        assert_eq!(stats.reference_books, 1);
        assert_eq!(stats.catalog_value, Money::from_pesos(38_970));
    }

    #[test]
    fn test_search_combines_criteria() {
        let repo = repo_with_catalog();

        let hits = repo.search(&BookSearch {
            category: Some("Programacion".to_string()),
            year_from: Some(2022),
            ..BookSearch::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), 3);

        // No criteria matches everything.
        assert_eq!(repo.search(&BookSearch::default()).len(), 3);

        let none = repo.search(&BookSearch {
            author: Some("goodrich".to_string()),
            only_available: true,
            year_to: Some(2019),
            ..BookSearch::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn test_list_ordered_by_price() {
        let repo = repo_with_catalog();
        let books = repo.list_ordered(BookOrder::Price);
        let prices: Vec<i64> = books.iter().map(|b| b.base_price().pesos()).collect();
        assert_eq!(prices, vec![9_990, 12_990, 15_990]);

        let by_author = repo.list_ordered(BookOrder::Author);
        assert_eq!(by_author[0].author(), "Goodrich");
    }

    #[test]
    fn test_availability_explains_the_reason() {
        let repo = repo_with_catalog();

        assert_eq!(repo.availability(1).unwrap(), Availability::Available { copies: 3 });
        assert_eq!(repo.availability(2).unwrap(), Availability::Reference);
        assert_eq!(repo.availability(3).unwrap(), Availability::Digital);

        for _ in 0..3 {
            repo.reserve_copy(1).unwrap();
        }
        assert_eq!(repo.availability(1).unwrap(), Availability::NoCopies);

        assert!(matches!(
            repo.availability(99),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_book() {
        let repo = repo_with_catalog();
        assert!(repo.remove(2));
        assert!(!repo.remove(2));
        assert_eq!(repo.list().len(), 2);
    }
}
