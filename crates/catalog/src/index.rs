//! Catalog assembly and validation.
//!
//! This module builds a [`Catalog`] from the raw tables supplied by the
//! caller: insert both tables, build the genre index, and validate the
//! result. Loading the tables from files or network storage is a caller
//! concern; the catalog only ever sees in-memory rows.

use crate::error::{CatalogError, Result};
use crate::types::*;

impl Catalog {
    /// Build a catalog from a book table and an interaction table.
    ///
    /// This is the main entry point. Steps:
    /// 1. Insert all books (first-seen order is preserved)
    /// 2. Insert all interaction rows
    /// 3. Build the genre index
    /// 4. Validate field presence and referential integrity
    ///
    /// Fails on the first malformed row; a catalog is never handed out in a
    /// half-validated state.
    pub fn from_tables(books: Vec<Book>, interactions: Vec<Interaction>) -> Result<Self> {
        let mut catalog = Catalog::new();

        for book in books {
            catalog.insert_book(book);
        }
        for interaction in interactions {
            catalog.insert_interaction(interaction);
        }

        catalog.build_genre_index();
        catalog.validate()?;

        Ok(catalog)
    }

    /// Build the genre index after books are inserted
    pub fn build_genre_index(&mut self) {
        self.genre_index.clear();
        for &book_id in &self.book_order {
            if let Some(book) = self.books.get(&book_id) {
                self.genre_index
                    .entry(book.genre.clone())
                    .or_default()
                    .push(book_id);
            }
        }
    }

    /// Validate the assembled tables.
    ///
    /// Checks that:
    /// - Every book has a non-empty title and author
    /// - Every book's aggregate rating is in [1.0, 5.0]
    /// - Every interaction references a book present in the book table
    ///
    /// Numeric ranges on interactions (progress, explicit rating) are
    /// checked where the values are consumed, by the interaction matrix
    /// builder.
    pub fn validate(&self) -> Result<()> {
        for book in self.books.values() {
            if book.title.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    field: "title".to_string(),
                    book_id: book.id,
                });
            }
            if book.author.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    field: "author".to_string(),
                    book_id: book.id,
                });
            }
            if !(1.0..=5.0).contains(&book.rating) {
                return Err(CatalogError::InvalidValue {
                    field: "rating".to_string(),
                    value: book.rating.to_string(),
                });
            }
        }

        for interaction in &self.interactions {
            if !self.books.contains_key(&interaction.book_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Book".to_string(),
                    id: interaction.book_id,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: BookId, genre: &str) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Test Author".to_string(),
            narrator: "Test Narrator".to_string(),
            genre: genre.to_string(),
            description: "A story".to_string(),
            tags: vec!["classic".to_string()],
            duration_minutes: 400,
            rating: 4.2,
        }
    }

    fn interaction(user_id: UserId, book_id: BookId) -> Interaction {
        Interaction {
            user_id,
            book_id,
            progress: 80.0,
            rating: Some(4.0),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_from_tables_builds_indices() {
        let books = vec![book(1, "Fantasy"), book(2, "Mystery"), book(3, "Fantasy")];
        let interactions = vec![interaction(1, 1), interaction(1, 2), interaction(2, 3)];

        let catalog = Catalog::from_tables(books, interactions).unwrap();
        let (n_books, n_users, n_interactions) = catalog.counts();

        assert_eq!(n_books, 3);
        assert_eq!(n_users, 2);
        assert_eq!(n_interactions, 3);

        assert_eq!(catalog.get_books_by_genre("Fantasy"), &[1, 3]);
        assert_eq!(catalog.get_books_by_genre("Mystery"), &[2]);
        assert!(catalog.get_books_by_genre("Romance").is_empty());
    }

    #[test]
    fn test_book_order_is_first_seen() {
        let books = vec![book(5, "Fantasy"), book(2, "Mystery"), book(9, "Fantasy")];
        let catalog = Catalog::from_tables(books, Vec::new()).unwrap();

        assert_eq!(catalog.book_ids(), &[5, 2, 9]);
    }

    #[test]
    fn test_missing_title_rejected() {
        let mut bad = book(1, "Fantasy");
        bad.title = "  ".to_string();

        let result = Catalog::from_tables(vec![bad], Vec::new());
        assert!(matches!(result, Err(CatalogError::MissingField { .. })));
    }

    #[test]
    fn test_out_of_range_book_rating_rejected() {
        let mut bad = book(1, "Fantasy");
        bad.rating = 5.5;

        let result = Catalog::from_tables(vec![bad], Vec::new());
        assert!(matches!(result, Err(CatalogError::InvalidValue { .. })));
    }

    #[test]
    fn test_interaction_for_unknown_book_rejected() {
        let result = Catalog::from_tables(vec![book(1, "Fantasy")], vec![interaction(1, 42)]);
        assert!(matches!(
            result,
            Err(CatalogError::MissingReference { id: 42, .. })
        ));
    }
}
