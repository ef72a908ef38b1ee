//! # Validation Module
//!
//! Field validation utilities for BookSmart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (outside this workspace)                        │
//! │  ├── Basic prompt re-asking on empty input                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field validation                               │
//! │  ├── Emptiness / length / range checks                                 │
//! │  └── Runs before any record is constructed                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain constructors (types module)                           │
//! │  └── Variant-specific invariants (copy counts, reference rules)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use booksmart_core::validation::{validate_book_id, validate_title};
//!
//! validate_book_id(3).unwrap();
//! validate_title("Estructuras de Datos").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_BOOK_PRICE, MAX_LOAN_DAYS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an author name.
///
/// ## Rules
/// - Must not be empty
pub fn validate_author(author: &str) -> ValidationResult<()> {
    if author.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "author".to_string(),
        });
    }

    Ok(())
}

/// Validates a person name.
///
/// ## Rules
/// - Must be between 2 and 50 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() < 2 {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        });
    }

    if name.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// Deliberately lax: an email is valid when it contains an `@` and a
/// `.`. No full RFC parsing.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email.contains('@') || !email.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@' and '.'".to_string(),
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Must be between 6 and 20 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    if password.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Must not be empty (searching the whole catalog has its own call)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.is_empty() {
        return Err(ValidationError::Required {
            field: "query".to_string(),
        });
    }

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a book identifier.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_book_id(id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "book id".to_string(),
        });
    }

    Ok(())
}

/// Validates a user identifier.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_user_id(id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "user id".to_string(),
        });
    }

    Ok(())
}

/// Validates a base price in pesos.
///
/// ## Rules
/// - Must be between 0 and MAX_BOOK_PRICE
/// - Zero is allowed (promotional items)
pub fn validate_price(pesos: i64) -> ValidationResult<()> {
    if pesos < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "base price".to_string(),
        });
    }

    if pesos > MAX_BOOK_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "base price".to_string(),
            min: 0,
            max: MAX_BOOK_PRICE,
        });
    }

    Ok(())
}

/// Validates a loan period in days.
///
/// ## Rules
/// - Must be between 0 and MAX_LOAN_DAYS
/// - Zero means "not loanable" (reference books)
pub fn validate_loan_days(days: i64) -> ValidationResult<()> {
    if days < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "loan days".to_string(),
        });
    }

    if days > MAX_LOAN_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "loan days".to_string(),
            min: 0,
            max: MAX_LOAN_DAYS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Estructuras de Datos").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Oscar Munoz").is_ok());
        assert!(validate_name("O").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("osca.munozs@duocuc.cl").is_ok());
        assert!(validate_email("natalia.silva@gmail.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("no@dots").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("booksmart").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"x".repeat(21)).is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_book_id() {
        assert!(validate_book_id(1).is_ok());
        assert!(validate_book_id(0).is_err());
        assert!(validate_book_id(-3).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(12990).is_ok());
        assert!(validate_price(-100).is_err());
        assert!(validate_price(MAX_BOOK_PRICE + 1).is_err());
    }

    #[test]
    fn test_validate_loan_days() {
        assert!(validate_loan_days(0).is_ok());
        assert!(validate_loan_days(7).is_ok());
        assert!(validate_loan_days(MAX_LOAN_DAYS).is_ok());
        assert!(validate_loan_days(-1).is_err());
        assert!(validate_loan_days(MAX_LOAN_DAYS + 1).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  kotlin  ").unwrap(), "kotlin");
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
