//! Candidate and recommendation types for the ranking pipeline.

use catalog::BookId;
use serde::Serialize;

/// A book moving through the ranking pipeline.
///
/// Carries the blended score plus the normalized per-engine parts, so the
/// final output can report where a recommendation came from.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub book_id: BookId,
    /// Blended score the candidate is ranked by
    pub score: f64,
    /// Normalized collaborative contribution (0.0 when that engine had no
    /// score for this book)
    pub collaborative_score: f64,
    /// Normalized content contribution, same convention
    pub content_score: f64,
}

/// Final recommendation returned to the caller.
///
/// A flat, serializable snapshot: the scores plus enough book metadata for
/// a display layer to render a row without further lookups.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub tags: Vec<String>,
    pub hybrid_score: f64,
    pub collaborative_score: f64,
    pub content_score: f64,
}
