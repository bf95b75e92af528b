//! Interaction matrix construction.
//!
//! Turns raw interaction rows into a sparse user×book matrix plus the
//! bidirectional id↔index mappings everything downstream relies on.
//!
//! ## Algorithm
//! 1. Assign each distinct user a row and each distinct book a column, in
//!    first-seen order over the input rows
//! 2. Weight each cell: `rating * (progress/100)` when an explicit rating
//!    exists, else `progress/100`
//! 3. Resolve duplicate (user, book) rows by latest timestamp
//! 4. Assemble triplets into compressed sparse row storage
//!
//! Index assignment is stable only within a single build; rebuilding from a
//! reordered table may reorder indices. Downstream code must reconcile by
//! id, never by position.

use catalog::{BookId, CatalogError, Interaction, UserId};
use sprs::{CsMat, TriMat};
use std::collections::{HashMap, HashSet};

/// Sparse user×book interaction matrix with stable id↔index mappings.
///
/// All values fall in [0, 5]; a missing pair is an implicit zero and is not
/// stored. A recorded pair whose weighted value is 0.0 (progress 0, no
/// rating) is stored explicitly, so "has interacted" survives the trip into
/// sparse storage.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    matrix: CsMat<f64>,
    user_to_row: HashMap<UserId, usize>,
    row_to_user: Vec<UserId>,
    book_to_col: HashMap<BookId, usize>,
    col_to_book: Vec<BookId>,
}

impl InteractionMatrix {
    /// Build the matrix from raw interaction rows.
    ///
    /// Fails on the first row with progress outside [0, 100] or an explicit
    /// rating outside [1, 5]; callers must not score against a half-built
    /// matrix.
    pub fn build(interactions: &[Interaction]) -> Result<Self, CatalogError> {
        let mut user_to_row: HashMap<UserId, usize> = HashMap::new();
        let mut row_to_user: Vec<UserId> = Vec::new();
        let mut book_to_col: HashMap<BookId, usize> = HashMap::new();
        let mut col_to_book: Vec<BookId> = Vec::new();

        // (row, col) -> (timestamp, weighted value); later timestamps win
        let mut cells: HashMap<(usize, usize), (i64, f64)> = HashMap::new();

        for interaction in interactions {
            validate_row(interaction)?;

            let row = *user_to_row
                .entry(interaction.user_id)
                .or_insert_with(|| {
                    row_to_user.push(interaction.user_id);
                    row_to_user.len() - 1
                });
            let col = *book_to_col
                .entry(interaction.book_id)
                .or_insert_with(|| {
                    col_to_book.push(interaction.book_id);
                    col_to_book.len() - 1
                });

            let value = interaction.weighted_value();
            cells
                .entry((row, col))
                .and_modify(|(ts, v)| {
                    if interaction.timestamp >= *ts {
                        *ts = interaction.timestamp;
                        *v = value;
                    }
                })
                .or_insert((interaction.timestamp, value));
        }

        let mut triplets = TriMat::new((row_to_user.len(), col_to_book.len()));
        for (&(row, col), &(_, value)) in &cells {
            triplets.add_triplet(row, col, value);
        }

        Ok(Self {
            matrix: triplets.to_csr(),
            user_to_row,
            row_to_user,
            book_to_col,
            col_to_book,
        })
    }

    /// Number of distinct users (matrix rows)
    pub fn n_users(&self) -> usize {
        self.row_to_user.len()
    }

    /// Number of distinct books (matrix columns)
    pub fn n_books(&self) -> usize {
        self.col_to_book.len()
    }

    /// The underlying sparse matrix (users × books)
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// Row index for a user id, if the user appears in the matrix
    pub fn row_of(&self, user_id: UserId) -> Option<usize> {
        self.user_to_row.get(&user_id).copied()
    }

    /// Column index for a book id, if the book appears in the matrix
    pub fn col_of(&self, book_id: BookId) -> Option<usize> {
        self.book_to_col.get(&book_id).copied()
    }

    /// User id at a row index
    pub fn user_at(&self, row: usize) -> Option<UserId> {
        self.row_to_user.get(row).copied()
    }

    /// Book id at a column index
    pub fn book_at(&self, col: usize) -> Option<BookId> {
        self.col_to_book.get(col).copied()
    }

    /// All user ids, in row order
    pub fn user_ids(&self) -> &[UserId] {
        &self.row_to_user
    }

    /// All book ids, in column order
    pub fn book_ids(&self) -> &[BookId] {
        &self.col_to_book
    }

    /// Stored cell value for a (user, book) pair, if any was recorded
    pub fn value(&self, user_id: UserId, book_id: BookId) -> Option<f64> {
        let row = self.row_of(user_id)?;
        let col = self.col_of(book_id)?;
        self.matrix.get(row, col).copied()
    }

    /// A user's recorded interactions as (book id, weighted value) pairs,
    /// in column order. Empty for unknown users.
    pub fn user_books(&self, user_id: UserId) -> Vec<(BookId, f64)> {
        let Some(row) = self.row_of(user_id) else {
            return Vec::new();
        };
        match self.matrix.outer_view(row) {
            Some(row_vec) => row_vec
                .iter()
                .filter_map(|(col, &value)| self.book_at(col).map(|id| (id, value)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The set of books a user has any recorded interaction with,
    /// zero-valued interactions included.
    pub fn consumed_books(&self, user_id: UserId) -> HashSet<BookId> {
        self.user_books(user_id)
            .into_iter()
            .map(|(book_id, _)| book_id)
            .collect()
    }
}

fn validate_row(interaction: &Interaction) -> Result<(), CatalogError> {
    if !(0.0..=100.0).contains(&interaction.progress) {
        return Err(CatalogError::InvalidValue {
            field: "progress".to_string(),
            value: interaction.progress.to_string(),
        });
    }
    if let Some(rating) = interaction.rating
        && !(1.0..=5.0).contains(&rating)
    {
        return Err(CatalogError::InvalidValue {
            field: "rating".to_string(),
            value: rating.to_string(),
        });
    }
    Ok(())
}
