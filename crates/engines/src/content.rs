//! Content similarity engine.
//!
//! Finds books that read alike: cosine similarity over the content feature
//! rows (text, genre, duration). Also provides the per-genre shelf used for
//! browsing surfaces.
//!
//! Similarity explanations are a best-effort annotation layered on top of
//! the scores. A book with no shareable attributes simply gets an empty
//! reason list; reason construction can never fail a request.

use crate::error::EngineError;
use crate::features::ContentFeatures;
use crate::similarity::pairwise_cosine;
use catalog::{Book, BookId, Catalog};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// At most this many reasons are attached per similar book
const MAX_REASONS: usize = 3;

/// Durations within this many minutes of each other count as comparable
const SIMILAR_DURATION_MINUTES: u32 = 60;

/// A book scored against an anchor book, with optional explanations.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarBook {
    pub book_id: BookId,
    /// Cosine similarity to the anchor's feature row
    pub score: f64,
    /// Human-readable overlap notes, possibly empty
    pub reasons: Vec<String>,
}

/// Item-item similarity over content features.
pub struct ContentEngine {
    catalog: Arc<Catalog>,
    features: ContentFeatures,
    item_similarity: Vec<Vec<f64>>,
}

impl ContentEngine {
    /// Build the engine, precomputing the full item-item similarity matrix
    pub fn new(catalog: Arc<Catalog>, features: ContentFeatures) -> Self {
        let item_similarity = pairwise_cosine(features.matrix());
        debug!(
            books = features.n_books(),
            features = features.n_features(),
            "Computed item-item similarity matrix"
        );
        Self {
            catalog,
            features,
            item_similarity,
        }
    }

    /// The feature matrix this engine was built on
    pub fn features(&self) -> &ContentFeatures {
        &self.features
    }

    /// The `top_n` books most similar to the anchor, descending by
    /// similarity, ties by ascending book id.
    ///
    /// The anchor itself is excluded by identity; other books tied with it
    /// at similarity 1.0 are real results and are kept.
    #[instrument(skip(self), fields(book_id = book_id))]
    pub fn similar_books(
        &self,
        book_id: BookId,
        top_n: usize,
    ) -> Result<Vec<SimilarBook>, EngineError> {
        let row = self
            .features
            .row_of(book_id)
            .ok_or(EngineError::UnknownBook(book_id))?;

        let mut scored: Vec<(BookId, f64)> = self.item_similarity[row]
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != row)
            .filter_map(|(other, &sim)| self.features.book_at(other).map(|id| (id, sim)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(top_n);

        let anchor = self.catalog.get_book(book_id);
        let results = scored
            .into_iter()
            .map(|(id, score)| SimilarBook {
                book_id: id,
                score,
                reasons: match (anchor, self.catalog.get_book(id)) {
                    (Some(a), Some(b)) => similarity_reasons(a, b),
                    _ => Vec::new(),
                },
            })
            .collect();
        Ok(results)
    }

    /// The highest-rated books in a genre, descending by aggregate rating,
    /// ties by ascending book id. Unknown genres yield an empty shelf.
    pub fn top_by_genre(&self, genre: &str, top_n: usize) -> Vec<&Book> {
        let mut shelf: Vec<&Book> = self
            .catalog
            .get_books_by_genre(genre)
            .iter()
            .filter_map(|&id| self.catalog.get_book(id))
            .collect();
        shelf.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        shelf.truncate(top_n);
        shelf
    }
}

/// Why two books resemble each other, in display form.
///
/// Checks shared genre, shared tags (anchor tag order, at most two named),
/// and comparable duration.
fn similarity_reasons(anchor: &Book, other: &Book) -> Vec<String> {
    let mut reasons = Vec::new();

    if anchor.genre == other.genre {
        reasons.push(format!("Same genre: {}", anchor.genre));
    }

    let common_tags: Vec<&str> = anchor
        .tags
        .iter()
        .filter(|tag| other.tags.contains(tag))
        .map(String::as_str)
        .collect();
    if !common_tags.is_empty() {
        let named: Vec<&str> = common_tags.into_iter().take(2).collect();
        reasons.push(format!("Similar themes: {}", named.join(", ")));
    }

    if anchor.duration_minutes.abs_diff(other.duration_minutes) <= SIMILAR_DURATION_MINUTES {
        reasons.push("Similar length".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: BookId, genre: &str, description: &str, tags: &[&str], duration: u32) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Test Author".to_string(),
            narrator: "Test Narrator".to_string(),
            genre: genre.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            duration_minutes: duration,
            rating: 4.0,
        }
    }

    fn build_engine(books: Vec<Book>) -> ContentEngine {
        let features = ContentFeatures::build(&books);
        let catalog = Arc::new(Catalog::from_tables(books, Vec::new()).unwrap());
        ContentEngine::new(catalog, features)
    }

    fn scenario_books() -> Vec<Book> {
        vec![
            book(1, "Fiction", "a dark tale", &["dark", "classic"], 400),
            book(2, "Fiction", "a dark journey", &["dark", "uplifting"], 420),
            book(3, "Romance", "two hearts meet", &[], 800),
        ]
    }

    #[test]
    fn test_shared_attributes_rank_higher() {
        let engine = build_engine(scenario_books());
        let similar = engine.similar_books(1, 10).unwrap();

        let score_of = |id: BookId| {
            similar
                .iter()
                .find(|s| s.book_id == id)
                .map(|s| s.score)
                .unwrap()
        };
        // Book 2 shares genre, a tag, and comparable duration with book 1;
        // book 3 shares nothing
        assert!(score_of(2) > score_of(3));
    }

    #[test]
    fn test_anchor_excluded_by_identity_but_twins_kept() {
        let twin_a = book(1, "Fiction", "identical words here", &["dark"], 500);
        let mut twin_b = twin_a.clone();
        twin_b.id = 2;
        let mut twin_c = twin_a.clone();
        twin_c.id = 3;

        let engine = build_engine(vec![twin_a, twin_b, twin_c]);
        let similar = engine.similar_books(1, 10).unwrap();

        // Both twins score 1.0 and neither may be dropped for it
        assert_eq!(similar.len(), 2);
        assert!(similar.iter().all(|s| s.book_id != 1));
        assert!(similar.iter().all(|s| (s.score - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_reasons_name_the_overlap() {
        let engine = build_engine(scenario_books());
        let similar = engine.similar_books(1, 10).unwrap();

        let to_book_2 = similar.iter().find(|s| s.book_id == 2).unwrap();
        assert!(to_book_2.reasons.contains(&"Same genre: Fiction".to_string()));
        assert!(to_book_2.reasons.contains(&"Similar themes: dark".to_string()));
        assert!(to_book_2.reasons.contains(&"Similar length".to_string()));

        let to_book_3 = similar.iter().find(|s| s.book_id == 3).unwrap();
        assert!(to_book_3.reasons.is_empty());
    }

    #[test]
    fn test_unknown_book_is_an_error() {
        let engine = build_engine(scenario_books());

        assert_eq!(
            engine.similar_books(999, 5).unwrap_err(),
            EngineError::UnknownBook(999)
        );
    }

    #[test]
    fn test_top_by_genre_orders_by_rating() {
        let mut books = scenario_books();
        books[0].rating = 3.5;
        books[1].rating = 4.8;

        let engine = build_engine(books);
        let shelf = engine.top_by_genre("Fiction", 5);

        let ids: Vec<BookId> = shelf.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(engine.top_by_genre("Western", 5).is_empty());
    }
}
