//! # Seed Data
//!
//! The demo catalog: the fixed set of books and users the system ships
//! with. Used by the demo binary and by integration tests that want a
//! realistic catalog without building one by hand.
//!
//! ## Contents
//! - 5 books: 2 physical, 1 reference, 2 digital
//! - 4 users: one per category (admin, student, faculty, external)

use tracing::info;

use crate::error::StoreResult;
use crate::store::CatalogStore;
use booksmart_core::{Book, FileFormat, Money, User};

/// Builds a store pre-loaded with the demo catalog.
pub fn demo_store() -> StoreResult<CatalogStore> {
    let store = CatalogStore::new();
    seed_catalog(&store)?;
    Ok(store)
}

/// Loads the demo books and users into an existing store.
pub fn seed_catalog(store: &CatalogStore) -> StoreResult<()> {
    let books = demo_books()?;
    let users = demo_users()?;

    store.with_catalog_mut(|cat| {
        cat.books.extend(books);
        cat.users.extend(users);
    });

    info!("Seeded demo catalog: 5 books, 4 users");
    Ok(())
}

fn demo_books() -> StoreResult<Vec<Book>> {
    Ok(vec![
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
        )?,
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
        )?,
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
        )?,
        Book::digital(
            4,
            "Algoritmos Basicos",
            "Cormen",
            "Algoritmos",
            2022,
            Money::from_pesos(11_990),
            10,
            false,
            FileFormat::Epub,
            8.2,
        )?,
        Book::physical(
            5,
            "Introduccion a Android",
            "Google Developers",
            "Desarrollo Movil",
            2024,
            Money::from_pesos(18_500),
            14,
            2,
            false,
        )?,
    ])
}

fn demo_users() -> StoreResult<Vec<User>> {
    Ok(vec![
        User::new(1, "Administrador", "admin@booksmart.com", "booksmart")?,
        User::new(2, "Oscar Munoz", "osca.munozs@duocuc.cl", "123456")?,
        User::new(3, "Juan Azocar", "juan.azocar@duoc.cl", "docente123")?,
        User::new(4, "Natalia Silva", "natalia.silva@gmail.com", "externo123")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use booksmart_core::UserCategory;

    #[test]
    fn test_demo_catalog_shape() {
        let store = demo_store().unwrap();

        store.with_catalog(|cat| {
            assert_eq!(cat.books.len(), 5);
            assert_eq!(cat.users.len(), 4);

            // The reference title is not loanable.
            assert!(!cat.book(2).unwrap().is_loanable());
            // Every other title is.
            for id in [1, 3, 4, 5] {
                assert!(cat.book(id).unwrap().is_loanable(), "book {id}");
            }
        });
    }

    #[test]
    fn test_demo_users_cover_every_category() {
        let store = demo_store().unwrap();

        store.with_catalog(|cat| {
            assert_eq!(cat.user(1).unwrap().category, UserCategory::Admin);
            assert_eq!(cat.user(2).unwrap().category, UserCategory::Student);
            assert_eq!(cat.user(3).unwrap().category, UserCategory::Faculty);
            assert_eq!(cat.user(4).unwrap().category, UserCategory::External);
        });
    }
}
