//! Content feature construction.
//!
//! Turns book metadata into one sparse numeric feature row per book:
//!
//! 1. TF-IDF over the free text (description + tags), capped vocabulary
//! 2. One-hot encoded genre
//! 3. Duration min-max scaled to [0, 1]
//!
//! The three blocks are concatenated column-wise, in that order. Rows live
//! in an index space of their own: a book's feature row index is unrelated
//! to its interaction-matrix column index, and the two are only ever
//! reconciled through the book id.

use crate::text::TfIdfVectorizer;
use catalog::{Book, BookId};
use sprs::{CsMat, TriMat};
use std::collections::{BTreeSet, HashMap};

/// Vocabulary cap for the text block
const MAX_TEXT_FEATURES: usize = 1000;

/// Sparse book×feature matrix with its id mappings and column semantics.
///
/// Given the same book table, the matrix and its feature names are
/// reproducible exactly: vocabulary selection is deterministic, genre
/// columns are sorted alphabetically, and rows follow the table's
/// first-seen book order.
#[derive(Debug, Clone)]
pub struct ContentFeatures {
    matrix: CsMat<f64>,
    book_to_row: HashMap<BookId, usize>,
    row_to_book: Vec<BookId>,
    feature_names: Vec<String>,
}

impl ContentFeatures {
    /// Build the feature matrix from a book table.
    pub fn build(books: &[Book]) -> Self {
        let corpus: Vec<String> = books
            .iter()
            .map(|book| format!("{} {}", book.description, book.tags.join(" ")))
            .collect();
        let vectorizer = TfIdfVectorizer::fit(&corpus, MAX_TEXT_FEATURES);

        let genres: Vec<String> = books
            .iter()
            .map(|book| book.genre.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let genre_col: HashMap<&str, usize> = genres
            .iter()
            .enumerate()
            .map(|(idx, genre)| (genre.as_str(), idx))
            .collect();

        let min_duration = books.iter().map(|b| b.duration_minutes).min().unwrap_or(0);
        let max_duration = books.iter().map(|b| b.duration_minutes).max().unwrap_or(0);
        let duration_range = f64::from(max_duration) - f64::from(min_duration);

        let text_cols = vectorizer.n_terms();
        let genre_cols = genres.len();
        let total_cols = text_cols + genre_cols + 1;

        let mut book_to_row = HashMap::new();
        let mut row_to_book = Vec::new();
        let mut triplets = TriMat::new((books.len(), total_cols));

        for (row, book) in books.iter().enumerate() {
            book_to_row.insert(book.id, row);
            row_to_book.push(book.id);

            for (col, weight) in vectorizer.transform(&corpus[row]) {
                triplets.add_triplet(row, col, weight);
            }

            if let Some(&col) = genre_col.get(book.genre.as_str()) {
                triplets.add_triplet(row, text_cols + col, 1.0);
            }

            // Constant duration across the table maps to 0.0 for everyone
            let scaled = if duration_range > 0.0 {
                (f64::from(book.duration_minutes) - f64::from(min_duration)) / duration_range
            } else {
                0.0
            };
            if scaled > 0.0 {
                triplets.add_triplet(row, text_cols + genre_cols, scaled);
            }
        }

        let mut feature_names: Vec<String> = vectorizer
            .terms()
            .iter()
            .map(|term| format!("term:{}", term))
            .collect();
        feature_names.extend(genres.iter().map(|genre| format!("genre:{}", genre)));
        feature_names.push("duration".to_string());

        Self {
            matrix: triplets.to_csr(),
            book_to_row,
            row_to_book,
            feature_names,
        }
    }

    /// Number of books (matrix rows)
    pub fn n_books(&self) -> usize {
        self.row_to_book.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// The underlying sparse matrix (books × features)
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// Row index for a book id, if the book appears in the table
    pub fn row_of(&self, book_id: BookId) -> Option<usize> {
        self.book_to_row.get(&book_id).copied()
    }

    /// Book id at a row index
    pub fn book_at(&self, row: usize) -> Option<BookId> {
        self.row_to_book.get(row).copied()
    }

    /// Column names (`term:…`, then `genre:…`, then `duration`)
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
