//! Core domain types for the audiobook catalog.
//!
//! This module defines the fundamental data structures used throughout the
//! system: books, listening interactions, and the in-memory `Catalog` that
//! holds and indexes both tables for the scoring layers above.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with book IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for an audiobook
pub type BookId = u32;

// =============================================================================
// Book
// =============================================================================

/// An audiobook and its metadata.
///
/// Immutable during a scoring session; the whole table is handed over once
/// per model build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Narrator is display metadata only and takes no part in scoring
    pub narrator: String,
    pub genre: String,
    /// Free-text description, feeds the text features
    pub description: String,
    pub tags: Vec<String>,
    /// Total runtime in minutes
    pub duration_minutes: u32,
    /// Aggregate catalog rating (1.0 - 5.0)
    pub rating: f32,
}

// =============================================================================
// Interaction
// =============================================================================

/// A single listening interaction between a user and a book.
///
/// At most one interaction per (user, book) pair is modeled downstream;
/// duplicate rows resolve to the latest timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub book_id: BookId,
    /// How far the user got, as a percentage (0.0 - 100.0)
    pub progress: f32,
    /// Explicit rating, when the user left one (1.0 - 5.0)
    pub rating: Option<f32>,
    /// Unix timestamp of the interaction
    pub timestamp: i64,
}

impl Interaction {
    /// Weighted interaction value used everywhere downstream:
    /// `rating * (progress/100)` when an explicit rating exists, else
    /// `progress/100`. Always falls in [0, 5] for valid rows.
    pub fn weighted_value(&self) -> f64 {
        let progress_weight = f64::from(self.progress) / 100.0;
        match self.rating {
            Some(rating) => f64::from(rating) * progress_weight,
            None => progress_weight,
        }
    }
}

// =============================================================================
// Catalog - The In-Memory Store
// =============================================================================

/// Holds the book and interaction tables and the indices over them.
///
/// The catalog owns the data; getters hand out references or slices. It is
/// never mutated after [`Catalog::from_tables`] returns, so it can be shared
/// freely behind an `Arc` by concurrent readers.
#[derive(Debug, Default)]
pub struct Catalog {
    // Primary data stores
    pub(crate) books: HashMap<BookId, Book>,
    /// Book ids in first-seen table order. Feature rows are built in this
    /// order, so it must be stable for a given input table.
    pub(crate) book_order: Vec<BookId>,
    /// Interaction rows in original table order
    pub(crate) interactions: Vec<Interaction>,

    // Secondary indices
    /// All interactions recorded for each user
    pub(crate) user_interactions: HashMap<UserId, Vec<Interaction>>,
    /// Books grouped by genre, in first-seen order within each genre
    pub(crate) genre_index: HashMap<String, Vec<BookId>>,
}

impl Catalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a book by id
    pub fn get_book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Books in first-seen table order
    pub fn books_in_order(&self) -> impl Iterator<Item = &Book> {
        self.book_order.iter().filter_map(|id| self.books.get(id))
    }

    /// Book ids in first-seen table order
    pub fn book_ids(&self) -> &[BookId] {
        &self.book_order
    }

    /// All interaction rows, in original table order
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// All interactions recorded for a user.
    ///
    /// Returns an empty slice if the user has no interactions.
    pub fn get_user_interactions(&self, user_id: UserId) -> &[Interaction] {
        self.user_interactions
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All books in a specific genre, in first-seen order
    pub fn get_books_by_genre(&self, genre: &str) -> &[BookId] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get counts for logging/validation: (books, users, interactions)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.books.len(),
            self.user_interactions.len(),
            self.interactions.len(),
        )
    }

    // Mutators - used while assembling the catalog in `from_tables`

    /// Insert a book. A repeated id keeps its first-seen position but the
    /// later row's metadata wins.
    pub fn insert_book(&mut self, book: Book) {
        if !self.books.contains_key(&book.id) {
            self.book_order.push(book.id);
        }
        self.books.insert(book.id, book);
    }

    /// Insert an interaction row and update the per-user index
    pub fn insert_interaction(&mut self, interaction: Interaction) {
        self.user_interactions
            .entry(interaction.user_id)
            .or_default()
            .push(interaction.clone());
        self.interactions.push(interaction);
    }
}
