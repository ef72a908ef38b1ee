//! # Domain Types
//!
//! Core domain types used throughout BookSmart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      User       │   │      Loan       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Physical(..)   │   │  id             │   │  id             │       │
//! │  │  Digital(..)    │   │  category       │   │  book_id (ref)  │       │
//! │  │  (closed enum)  │   │  late_returns   │   │  user_id (ref)  │       │
//! │  └─────────────────┘   └─────────────────┘   │  price snapshot │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  UserCategory   │   │   LoanStatus    │   │   FileFormat    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Student 10%    │   │  Pending        │   │  Pdf            │       │
//! │  │  Faculty 15%    │   │  InProgress{..} │   │  Epub           │       │
//! │  │  External 0%    │   │  Returned       │   │  Mobi           │       │
//! │  │  Admin 0%       │   │  Error{..}      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Closed Variants, Not Inheritance
//! A book is a closed enum over two variant structs sharing `BookDetails`.
//! Every call site that cares about the variant matches exhaustively;
//! there is no open-ended subclassing to defeat the invariants.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::DiscountRate;
use crate::validation::{
    validate_author, validate_email, validate_loan_days, validate_name, validate_password,
    validate_price, validate_title,
};
use crate::{ADMIN_EMAIL, FACULTY_EMAIL_DOMAIN, MAX_LATE_RETURNS, STUDENT_EMAIL_DOMAIN};

// =============================================================================
// User Category
// =============================================================================

/// The category of a library user, derived from the email address.
///
/// The category fixes the discount rate applied to every loan the user
/// takes out. Admin exists for the toy login flow and borrows at full
/// price like external users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCategory {
    /// Institutional student (@duocuc.cl): 10% discount.
    Student,
    /// Institutional faculty (@duoc.cl): 15% discount.
    Faculty,
    /// Anyone else: no discount.
    External,
    /// System administrator account: no discount.
    Admin,
}

impl UserCategory {
    /// Derives the category from an email address suffix.
    ///
    /// ## Example
    /// ```rust
    /// use booksmart_core::types::UserCategory;
    ///
    /// assert_eq!(UserCategory::from_email("ana@duocuc.cl"), UserCategory::Student);
    /// assert_eq!(UserCategory::from_email("juan@duoc.cl"), UserCategory::Faculty);
    /// assert_eq!(UserCategory::from_email("admin@booksmart.com"), UserCategory::Admin);
    /// assert_eq!(UserCategory::from_email("n@gmail.com"), UserCategory::External);
    /// ```
    pub fn from_email(email: &str) -> Self {
        if email == ADMIN_EMAIL {
            UserCategory::Admin
        } else if email.ends_with(STUDENT_EMAIL_DOMAIN) {
            UserCategory::Student
        } else if email.ends_with(FACULTY_EMAIL_DOMAIN) {
            UserCategory::Faculty
        } else {
            UserCategory::External
        }
    }

    /// Returns the discount rate for this category.
    #[inline]
    pub const fn discount_rate(&self) -> DiscountRate {
        DiscountRate::for_category(*self)
    }

    /// Human-readable category label.
    pub const fn description(&self) -> &'static str {
        match self {
            UserCategory::Student => "Student",
            UserCategory::Faculty => "Faculty",
            UserCategory::External => "External user",
            UserCategory::Admin => "System administrator",
        }
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

// =============================================================================
// File Format
// =============================================================================

/// Distribution format of a digital book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pdf,
    Epub,
    Mobi,
}

impl Default for FileFormat {
    fn default() -> Self {
        FileFormat::Pdf
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Pdf => "PDF",
            FileFormat::Epub => "EPUB",
            FileFormat::Mobi => "MOBI",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Book
// =============================================================================

/// Attributes shared by every book variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    /// Unique identifier (small positive integer), immutable.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Free-form category label ("Programacion", "Referencia", ...).
    pub category: String,

    /// Publication year.
    pub year: i32,

    /// Base price before any user discount.
    pub base_price: Money,

    /// Loan period in days. Zero means the book can never be loaned.
    pub loan_days: i64,
}

/// A physical book with a finite number of copies on the shelves.
///
/// ## Invariants
/// - `total_copies > 0`
/// - `0 <= available_copies <= total_copies`
/// - `reference` books have `loan_days == 0` (forced at construction)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalBook {
    details: BookDetails,

    /// Total copies owned by the library.
    pub total_copies: u32,

    /// Copies currently on the shelf. Mutated only through
    /// `reserve_copy` / `release_copy`.
    available_copies: u32,

    /// Reference-only books may never leave the library.
    pub reference: bool,
}

impl PhysicalBook {
    /// Shared attributes.
    #[inline]
    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    /// Copies currently available for loan.
    #[inline]
    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    /// Takes one copy off the shelf. Fails when the book is reference-only
    /// or no copy is available, leaving the count untouched.
    pub fn reserve_copy(&mut self) -> CoreResult<()> {
        if self.reference || self.available_copies == 0 || self.details.loan_days == 0 {
            return Err(CoreError::CopyUnavailable {
                book_id: self.details.id,
            });
        }
        self.available_copies -= 1;
        Ok(())
    }

    /// Puts a copy back on the shelf. Saturates at `total_copies` so a
    /// stray release can never make availability exceed ownership.
    pub fn release_copy(&mut self) {
        if self.available_copies < self.total_copies {
            self.available_copies += 1;
        }
    }
}

/// A digital book. Never depletes: any number of users can hold it at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalBook {
    details: BookDetails,

    /// Whether the file is DRM-protected.
    pub drm: bool,

    /// Distribution format.
    pub format: FileFormat,

    /// File size in megabytes.
    pub size_mb: f64,
}

impl DigitalBook {
    /// Shared attributes.
    #[inline]
    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    /// DRM-protected files require an authenticated reader session.
    #[inline]
    pub fn requires_drm_auth(&self) -> bool {
        self.drm
    }

    /// Generates the (simulated) temporary download URL.
    pub fn download_url(&self) -> String {
        format!(
            "https://booksmart.duoc.cl/downloads/{}/{}",
            self.details.id,
            self.details.title.replace(' ', "_").to_lowercase()
        )
    }
}

/// A book in the catalog: a closed set of two variants.
///
/// ## Loanability
/// `is_loanable()` is the single source of truth:
/// - loan period must be > 0, and
/// - physical books must not be reference-only and must have a copy free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Book {
    Physical(PhysicalBook),
    Digital(DigitalBook),
}

impl Book {
    /// Creates a physical book, validating every field.
    ///
    /// Reference books get their loan period forced to zero regardless of
    /// the `loan_days` argument.
    #[allow(clippy::too_many_arguments)]
    pub fn physical(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        year: i32,
        base_price: Money,
        loan_days: i64,
        total_copies: u32,
        reference: bool,
    ) -> CoreResult<Book> {
        let mut details =
            BookDetails::validated(id, title, author, category, year, base_price, loan_days)?;
        if total_copies == 0 {
            return Err(ValidationError::MustBePositive {
                field: "total copies".to_string(),
            }
            .into());
        }

        if reference {
            details.loan_days = 0;
        }

        Ok(Book::Physical(PhysicalBook {
            details,
            total_copies,
            available_copies: total_copies,
            reference,
        }))
    }

    /// Creates a digital book, validating every field.
    #[allow(clippy::too_many_arguments)]
    pub fn digital(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        year: i32,
        base_price: Money,
        loan_days: i64,
        drm: bool,
        format: FileFormat,
        size_mb: f64,
    ) -> CoreResult<Book> {
        let details = BookDetails::validated(id, title, author, category, year, base_price, loan_days)?;
        if size_mb < 0.0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "file size".to_string(),
            }
            .into());
        }

        Ok(Book::Digital(DigitalBook {
            details,
            drm,
            format,
            size_mb,
        }))
    }

    /// Shared attributes for either variant.
    pub fn details(&self) -> &BookDetails {
        match self {
            Book::Physical(b) => b.details(),
            Book::Digital(b) => b.details(),
        }
    }

    /// Unique identifier.
    #[inline]
    pub fn id(&self) -> i64 {
        self.details().id
    }

    /// Display title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.details().title
    }

    /// Author name.
    #[inline]
    pub fn author(&self) -> &str {
        &self.details().author
    }

    /// Category label.
    #[inline]
    pub fn category(&self) -> &str {
        &self.details().category
    }

    /// Base price before discount.
    #[inline]
    pub fn base_price(&self) -> Money {
        self.details().base_price
    }

    /// Loan period in days.
    #[inline]
    pub fn loan_days(&self) -> i64 {
        self.details().loan_days
    }

    /// Final cost of the book today. Both variants currently charge their
    /// base price; the seam exists so a variant can diverge later.
    pub fn final_cost(&self) -> Money {
        match self {
            Book::Physical(b) => b.details().base_price,
            Book::Digital(b) => b.details().base_price,
        }
    }

    /// Whether the book can be loaned out right now.
    pub fn is_loanable(&self) -> bool {
        match self {
            Book::Physical(b) => {
                !b.reference && b.available_copies() > 0 && b.details().loan_days > 0
            }
            Book::Digital(b) => b.details().loan_days > 0,
        }
    }

    /// True for the physical variant.
    pub fn is_physical(&self) -> bool {
        matches!(self, Book::Physical(_))
    }

    /// True for reference-only physical books.
    pub fn is_reference(&self) -> bool {
        matches!(self, Book::Physical(b) if b.reference)
    }

    /// Physical variant accessor.
    pub fn as_physical(&self) -> Option<&PhysicalBook> {
        match self {
            Book::Physical(b) => Some(b),
            Book::Digital(_) => None,
        }
    }

    /// Mutable physical variant accessor.
    pub fn as_physical_mut(&mut self) -> Option<&mut PhysicalBook> {
        match self {
            Book::Physical(b) => Some(b),
            Book::Digital(_) => None,
        }
    }

    /// Digital variant accessor.
    pub fn as_digital(&self) -> Option<&DigitalBook> {
        match self {
            Book::Physical(_) => None,
            Book::Digital(b) => Some(b),
        }
    }

    /// Reserves a copy for a loan.
    ///
    /// Digital books never deplete, so reserving one is a no-op that
    /// always succeeds when the book is loanable at all.
    pub fn reserve_copy(&mut self) -> CoreResult<()> {
        match self {
            Book::Physical(b) => b.reserve_copy(),
            Book::Digital(b) => {
                if b.details().loan_days > 0 {
                    Ok(())
                } else {
                    Err(CoreError::CopyUnavailable {
                        book_id: b.details().id,
                    })
                }
            }
        }
    }

    /// Releases a previously reserved copy. No-op for digital books.
    pub fn release_copy(&mut self) {
        if let Book::Physical(b) = self {
            b.release_copy();
        }
    }

    /// Human description with variant-specific extras.
    pub fn describe(&self) -> String {
        let d = self.details();
        let base = format!("{} by {} ({})", d.title, d.author, d.year);
        match self {
            Book::Physical(b) => {
                let ref_text = if b.reference { " (reference)" } else { "" };
                let availability = if b.reference {
                    String::new()
                } else {
                    format!(" - {}/{} available", b.available_copies(), b.total_copies)
                };
                format!("{base}{ref_text}{availability}")
            }
            Book::Digital(b) => {
                let drm_text = if b.drm { " (DRM)" } else { "" };
                let size_text = if b.size_mb > 0.0 {
                    format!(" - {}MB", b.size_mb)
                } else {
                    String::new()
                };
                format!("{base}{drm_text}{size_text}")
            }
        }
    }
}

impl BookDetails {
    /// Validates every shared field and builds the struct.
    fn validated(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        year: i32,
        base_price: Money,
        loan_days: i64,
    ) -> CoreResult<BookDetails> {
        let title = title.into();
        let author = author.into();

        crate::validation::validate_book_id(id)?;
        validate_title(&title)?;
        validate_author(&author)?;
        validate_price(base_price.pesos())?;
        validate_loan_days(loan_days)?;

        Ok(BookDetails {
            id,
            title,
            author,
            category: category.into(),
            year,
            base_price,
            loan_days,
        })
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered library user.
///
/// ## Invariants
/// - `late_returns` only grows through `record_late_return` (or resets to
///   zero through the explicit `reset_late_returns`)
/// - Borrowing is allowed only while `late_returns < MAX_LATE_RETURNS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (small positive integer).
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Login email. Also determines the category.
    pub email: String,

    /// Login password. Plain comparison only; this is a teaching system,
    /// not an identity provider.
    pub password: String,

    /// Derived from the email at registration.
    pub category: UserCategory,

    /// Cumulative count of late returns.
    late_returns: u32,
}

impl User {
    /// Registers a user, validating every field and deriving the category
    /// from the email suffix.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> CoreResult<User> {
        let name = name.into();
        let email = email.into();
        let password = password.into();

        crate::validation::validate_user_id(id)?;
        validate_name(&name)?;
        validate_email(&email)?;
        validate_password(&password)?;

        let category = UserCategory::from_email(&email);
        Ok(User {
            id,
            name,
            email,
            password,
            category,
            late_returns: 0,
        })
    }

    /// Cumulative late-return count.
    #[inline]
    pub fn late_returns(&self) -> u32 {
        self.late_returns
    }

    /// Whether the user may initiate a new loan.
    #[inline]
    pub fn can_borrow(&self) -> bool {
        self.late_returns < MAX_LATE_RETURNS
    }

    /// Records one late return against the user.
    pub fn record_late_return(&mut self) {
        self.late_returns += 1;
    }

    /// Clears the late-return count. Never called by the normal loan flow;
    /// exists for an explicit administrative amnesty.
    pub fn reset_late_returns(&mut self) {
        self.late_returns = 0;
    }

    /// Checks login credentials against this user.
    pub fn verify_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    /// The discount rate this user's category grants.
    #[inline]
    pub fn discount_rate(&self) -> DiscountRate {
        self.category.discount_rate()
    }
}

// =============================================================================
// Loan Status
// =============================================================================

/// Sealed state machine for a loan.
///
/// ```text
/// Pending ──► InProgress ──► Returned (terminal)
///    │             │
///    └─────────────┴───────► Error(reason) (terminal)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoanStatus {
    /// Requested but not yet processed.
    Pending,
    /// Book is out with the user.
    InProgress {
        /// Days until the due date at processing time; negative if the
        /// loan was already overdue when processed.
        days_remaining: i64,
    },
    /// Book came back. Terminal.
    Returned,
    /// Something went wrong during processing. Terminal.
    Error { message: String },
}

impl LoanStatus {
    /// A loan is active while it is `Pending` or `InProgress`.
    pub fn is_active(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::InProgress { .. })
    }

    /// `Returned` and `Error` admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Human-readable status line.
    pub fn description(&self) -> String {
        match self {
            LoanStatus::Pending => "Loan pending processing".to_string(),
            LoanStatus::InProgress { days_remaining } => {
                format!("On loan - {days_remaining} days remaining")
            }
            LoanStatus::Returned => "Book returned".to_string(),
            LoanStatus::Error { message } => format!("Error: {message}"),
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::InProgress { .. } => "InProgress",
            LoanStatus::Returned => "Returned",
            LoanStatus::Error { .. } => "Error",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Loan
// =============================================================================

/// A loan of one book to one user.
///
/// Holds id references only; the catalog store owns the actual book and
/// user records. Price fields are snapshots computed once at creation, so
/// later price or category changes never affect an existing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier assigned by the store.
    pub id: i64,

    /// Borrowed book (by id).
    pub book_id: i64,

    /// Borrowing user (by id).
    pub user_id: i64,

    /// Day the loan was created.
    pub loan_date: NaiveDate,

    /// `loan_date + book.loan_days`.
    pub due_date: NaiveDate,

    /// Book base price at creation (frozen).
    pub base_price: Money,

    /// Discount granted at creation (frozen).
    pub discount: Money,

    /// `base_price - discount` (frozen).
    pub total_cost: Money,

    status: LoanStatus,
    returned_on: Option<NaiveDate>,
}

impl Loan {
    /// Creates a loan for a loanable book and an eligible user.
    ///
    /// The price snapshot is computed here, once, from the user's category
    /// rate. Construction fails if the book is not loanable or the user
    /// cannot borrow; callers decide how to surface that.
    pub fn new(id: i64, book: &Book, user: &User, today: NaiveDate) -> CoreResult<Loan> {
        if !book.is_loanable() {
            return Err(CoreError::BookNotLoanable { book_id: book.id() });
        }
        if !user.can_borrow() {
            return Err(CoreError::IneligibleUser { user_id: user.id });
        }

        let rate = user.discount_rate();
        let base_price = book.base_price();
        let discount = base_price.discount_amount(rate);

        Ok(Loan {
            id,
            book_id: book.id(),
            user_id: user.id,
            loan_date: today,
            due_date: today + Duration::days(book.loan_days()),
            base_price,
            discount,
            total_cost: base_price - discount,
            status: LoanStatus::Pending,
            returned_on: None,
        })
    }

    /// Current state.
    #[inline]
    pub fn status(&self) -> &LoanStatus {
        &self.status
    }

    /// Actual return date, once returned.
    #[inline]
    pub fn returned_on(&self) -> Option<NaiveDate> {
        self.returned_on
    }

    /// Active means `Pending` or `InProgress`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Days until the due date; negative when overdue.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// The date overdue-day math runs against: the actual return date for
    /// returned loans, otherwise the given "today".
    pub fn effective_date(&self, today: NaiveDate) -> NaiveDate {
        self.returned_on.unwrap_or(today)
    }

    /// Whether the loan is past due as of the effective date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.effective_date(today) > self.due_date
    }

    /// Transition `Pending → InProgress`, computing days remaining.
    pub fn start(&mut self, today: NaiveDate) -> CoreResult<()> {
        match self.status {
            LoanStatus::Pending => {
                self.status = LoanStatus::InProgress {
                    days_remaining: self.days_remaining(today),
                };
                Ok(())
            }
            _ => Err(self.transition_error()),
        }
    }

    /// Transition `Pending/InProgress → Returned`, stamping the return
    /// date. Fails on terminal states so a double return never sticks.
    pub fn mark_returned(&mut self, today: NaiveDate) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error());
        }
        self.status = LoanStatus::Returned;
        self.returned_on = Some(today);
        Ok(())
    }

    /// Transition `Pending/InProgress → Error(reason)`.
    pub fn mark_error(&mut self, message: impl Into<String>) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error());
        }
        self.status = LoanStatus::Error {
            message: message.into(),
        };
        Ok(())
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        format!(
            "loan {} (book {}, user {}) due {} - {}",
            self.id,
            self.book_id,
            self.user_id,
            self.due_date.format("%d/%m/%Y"),
            self.status.description()
        )
    }

    fn transition_error(&self) -> CoreError {
        CoreError::InvalidTransition {
            loan_id: self.id,
            status: self.status.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn physical_book() -> Book {
        Book::physical(
            1,
            "Estructuras de Datos",
            "Goodrich",
            "Programacion",
            2020,
            Money::from_pesos(12990),
            7,
            3,
            false,
        )
        .unwrap()
    }

    fn student() -> User {
        User::new(2, "Oscar Munoz", "osca.munozs@duocuc.cl", "123456").unwrap()
    }

    #[test]
    fn test_category_from_email() {
        assert_eq!(
            UserCategory::from_email("a.b@duocuc.cl"),
            UserCategory::Student
        );
        assert_eq!(UserCategory::from_email("a.b@duoc.cl"), UserCategory::Faculty);
        assert_eq!(
            UserCategory::from_email("admin@booksmart.com"),
            UserCategory::Admin
        );
        assert_eq!(
            UserCategory::from_email("a.b@gmail.com"),
            UserCategory::External
        );
    }

    #[test]
    fn test_reference_book_forces_zero_loan_days() {
        let book = Book::physical(
            2,
            "Diccionario Enciclopedico",
            "Varios",
            "Referencia",
            2019,
            Money::from_pesos(15990),
            14, // ignored: reference books are never loanable
            1,
            true,
        )
        .unwrap();

        assert_eq!(book.loan_days(), 0);
        assert!(!book.is_loanable());
        assert!(book.is_reference());
    }

    #[test]
    fn test_digital_book_loanable_without_copies() {
        let book = Book::digital(
            3,
            "Programacion en Kotlin",
            "JetBrains",
            "Programacion",
            2023,
            Money::from_pesos(9990),
            10,
            true,
            FileFormat::Pdf,
            15.5,
        )
        .unwrap();

        assert!(book.is_loanable());
        assert!(!book.is_physical());
        assert!(book.as_digital().unwrap().requires_drm_auth());
    }

    #[test]
    fn test_digital_download_url() {
        let book = Book::digital(
            4,
            "Algoritmos Basicos",
            "Cormen",
            "Algoritmos",
            2022,
            Money::from_pesos(11990),
            10,
            false,
            FileFormat::Epub,
            8.2,
        )
        .unwrap();

        assert_eq!(
            book.as_digital().unwrap().download_url(),
            "https://booksmart.duoc.cl/downloads/4/algoritmos_basicos"
        );
    }

    #[test]
    fn test_reserve_and_release_copies() {
        let mut book = physical_book();
        let physical = book.as_physical().unwrap();
        assert_eq!(physical.available_copies(), 3);

        book.reserve_copy().unwrap();
        book.reserve_copy().unwrap();
        book.reserve_copy().unwrap();
        assert_eq!(book.as_physical().unwrap().available_copies(), 0);
        assert!(!book.is_loanable());

        // Exhausted: reserving again fails, count stays at zero
        assert!(book.reserve_copy().is_err());
        assert_eq!(book.as_physical().unwrap().available_copies(), 0);

        book.release_copy();
        assert_eq!(book.as_physical().unwrap().available_copies(), 1);

        // Release never exceeds total
        book.release_copy();
        book.release_copy();
        book.release_copy();
        assert_eq!(book.as_physical().unwrap().available_copies(), 3);
    }

    #[test]
    fn test_book_validation() {
        // Non-positive id
        assert!(Book::physical(0, "T", "A", "C", 2020, Money::from_pesos(1), 7, 1, false).is_err());
        // Negative price
        assert!(
            Book::physical(1, "T", "A", "C", 2020, Money::from_pesos(-1), 7, 1, false).is_err()
        );
        // Zero copies
        assert!(
            Book::physical(1, "T", "A", "C", 2020, Money::from_pesos(1), 7, 0, false).is_err()
        );
        // Negative file size
        assert!(Book::digital(
            1,
            "T",
            "A",
            "C",
            2020,
            Money::from_pesos(1),
            7,
            false,
            FileFormat::Pdf,
            -1.0
        )
        .is_err());
    }

    #[test]
    fn test_user_eligibility_threshold() {
        let mut user = student();
        assert!(user.can_borrow());

        user.record_late_return();
        user.record_late_return();
        assert!(user.can_borrow());

        user.record_late_return();
        assert_eq!(user.late_returns(), 3);
        assert!(!user.can_borrow());

        user.reset_late_returns();
        assert!(user.can_borrow());
    }

    #[test]
    fn test_user_credentials() {
        let user = student();
        assert!(user.verify_credentials("osca.munozs@duocuc.cl", "123456"));
        assert!(!user.verify_credentials("osca.munozs@duocuc.cl", "wrong"));
        assert!(!user.verify_credentials("other@duocuc.cl", "123456"));
    }

    #[test]
    fn test_loan_snapshots_discount() {
        let book = physical_book();
        let user = student();
        let today = date(2024, 6, 1);

        let loan = Loan::new(1, &book, &user, today).unwrap();
        assert_eq!(loan.base_price.pesos(), 12990);
        assert_eq!(loan.discount.pesos(), 1299);
        assert_eq!(loan.total_cost.pesos(), 11691);
        assert_eq!(loan.due_date, date(2024, 6, 8));
        assert_eq!(*loan.status(), LoanStatus::Pending);
        assert!(loan.is_active());
    }

    #[test]
    fn test_loan_rejects_unloanable_book() {
        let book = Book::physical(
            2,
            "Diccionario",
            "Varios",
            "Referencia",
            2019,
            Money::from_pesos(15990),
            0,
            1,
            true,
        )
        .unwrap();
        let user = student();

        let result = Loan::new(1, &book, &user, date(2024, 6, 1));
        assert!(matches!(result, Err(CoreError::BookNotLoanable { book_id: 2 })));
    }

    #[test]
    fn test_loan_rejects_ineligible_user() {
        let book = physical_book();
        let mut user = student();
        user.record_late_return();
        user.record_late_return();
        user.record_late_return();

        let result = Loan::new(1, &book, &user, date(2024, 6, 1));
        assert!(matches!(result, Err(CoreError::IneligibleUser { user_id: 2 })));
    }

    #[test]
    fn test_loan_state_machine() {
        let book = physical_book();
        let user = student();
        let today = date(2024, 6, 1);
        let mut loan = Loan::new(1, &book, &user, today).unwrap();

        loan.start(today).unwrap();
        assert_eq!(
            *loan.status(),
            LoanStatus::InProgress { days_remaining: 7 }
        );

        loan.mark_returned(date(2024, 6, 5)).unwrap();
        assert_eq!(*loan.status(), LoanStatus::Returned);
        assert_eq!(loan.returned_on(), Some(date(2024, 6, 5)));
        assert!(!loan.is_active());

        // Terminal: no further transitions
        assert!(loan.start(today).is_err());
        assert!(loan.mark_returned(today).is_err());
        assert!(loan.mark_error("late failure").is_err());
    }

    #[test]
    fn test_loan_error_is_terminal() {
        let book = physical_book();
        let user = student();
        let today = date(2024, 6, 1);
        let mut loan = Loan::new(1, &book, &user, today).unwrap();

        loan.mark_error("processing failed").unwrap();
        assert!(!loan.is_active());
        assert!(loan.mark_returned(today).is_err());
    }

    #[test]
    fn test_overdue_uses_return_date_when_present() {
        let book = physical_book();
        let user = student();
        let mut loan = Loan::new(1, &book, &user, date(2024, 6, 1)).unwrap();
        // due 2024-06-08

        assert!(!loan.is_overdue(date(2024, 6, 8)));
        assert!(loan.is_overdue(date(2024, 6, 9)));

        loan.mark_returned(date(2024, 6, 7)).unwrap();
        // Returned on time: never overdue again, whatever "today" is
        assert!(!loan.is_overdue(date(2024, 7, 1)));
    }

    #[test]
    fn test_describe() {
        let book = physical_book();
        assert_eq!(
            book.describe(),
            "Estructuras de Datos by Goodrich (2020) - 3/3 available"
        );
    }
}
