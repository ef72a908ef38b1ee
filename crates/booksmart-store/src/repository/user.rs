//! # User Repository
//!
//! Catalog operations for registered users.
//!
//! ## Key Operations
//! - Registration with unique-email enforcement
//! - Credential-based authentication
//! - Late-return bookkeeping

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::CatalogStore;
use booksmart_core::User;

/// Repository for user operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(store.clone());
///
/// repo.insert(User::new(2, "Oscar Munoz", "osca.munozs@duocuc.cl", "123456")?)?;
/// let user = repo.authenticate("osca.munozs@duocuc.cl", "123456");
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: CatalogStore,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(store: CatalogStore) -> Self {
        UserRepository { store }
    }

    /// Registers a user.
    ///
    /// ## Errors
    /// * `StoreError::Duplicate` - the email is already registered
    pub fn insert(&self, user: User) -> StoreResult<()> {
        debug!(user_id = user.id, email = %user.email, "Registering user");

        self.store.with_catalog_mut(|cat| {
            if cat.users.iter().any(|u| u.email == user.email) {
                return Err(StoreError::duplicate("email", user.email.clone()));
            }
            if cat.user(user.id).is_some() {
                return Err(StoreError::duplicate("user id", user.id.to_string()));
            }
            cat.users.push(user);
            Ok(())
        })
    }

    /// Gets a user by id.
    pub fn get(&self, id: i64) -> Option<User> {
        self.store.with_catalog(|cat| cat.user(id).cloned())
    }

    /// Finds a user by exact email.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.store
            .with_catalog(|cat| cat.users.iter().find(|u| u.email == email).cloned())
    }

    /// Authenticates a user by email and password.
    ///
    /// ## Returns
    /// * `Some(User)` - credentials matched
    /// * `None` - unknown email or wrong password
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        debug!(email = %email, "Authenticating user");
        self.store.with_catalog(|cat| {
            cat.users
                .iter()
                .find(|u| u.verify_credentials(email, password))
                .cloned()
        })
    }

    /// Lists every registered user.
    pub fn list(&self) -> Vec<User> {
        self.store.with_catalog(|cat| cat.users.clone())
    }

    /// Increments a user's late-return counter.
    ///
    /// ## Returns
    /// The new counter value.
    pub fn record_late_return(&self, id: i64) -> StoreResult<u32> {
        self.store.with_catalog_mut(|cat| {
            let user = cat.user_mut(id).ok_or_else(|| StoreError::not_found("User", id))?;
            user.record_late_return();
            debug!(user_id = id, late_returns = user.late_returns(), "Recorded late return");
            Ok(user.late_returns())
        })
    }

    /// Clears a user's late-return counter (administrative amnesty).
    pub fn reset_late_returns(&self, id: i64) -> StoreResult<()> {
        debug!(user_id = id, "Resetting late returns");
        self.store.with_catalog_mut(|cat| {
            let user = cat.user_mut(id).ok_or_else(|| StoreError::not_found("User", id))?;
            user.reset_late_returns();
            Ok(())
        })
    }
}
