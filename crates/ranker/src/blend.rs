//! The hybrid recommender.
//!
//! Coordinates the whole scoring pipeline:
//! 1. Build user history
//! 2. Fetch candidates from both engines (2x over-fetch absorbs the
//!    overlap and filtering losses further down)
//! 3. Normalize each engine's scores independently to [0, 1]
//! 4. Blend with the configured weights
//! 5. Apply filters (already-listened books are dropped here)
//! 6. Rank, truncate, and attach display metadata
//!
//! [`HybridRecommender::build`] is the only way to obtain a model: it
//! validates the tables, precomputes both similarity matrices, and returns
//! an immutable snapshot. Reloading data means building a fresh snapshot
//! and swapping the reference; there is no in-place refit.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use catalog::{Book, BookId, Catalog, CatalogError, Interaction, UserId};
use engines::{
    CollaborativeEngine, ContentEngine, ContentFeatures, InteractionMatrix, UserHistory,
    build_user_history,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::filter_pipeline::FilterPipeline;
use crate::filters::AlreadyListenedFilter;
use crate::types::{Candidate, Recommendation};
use crate::weights::{BlendWeights, ConfigError};

/// How many of the user's top books seed the content engine
const CONTENT_ANCHORS: usize = 3;

/// Candidate over-fetch factor per engine
const CANDIDATE_MULTIPLIER: usize = 2;

/// Fatal model construction failures.
///
/// A request must never be served against a half-built model, so every
/// variant here prevents the recommender from existing at all.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Malformed input rows in either table
    #[error(transparent)]
    Data(#[from] CatalogError),

    /// Invalid blend weight configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Immutable hybrid recommendation model.
///
/// Both similarity matrices are precomputed at build time; every field is
/// read-only afterwards, so the whole struct can sit behind an `Arc` and be
/// shared by concurrent request handlers.
pub struct HybridRecommender {
    catalog: Arc<Catalog>,
    collaborative: CollaborativeEngine,
    content: ContentEngine,
    weights: BlendWeights,
    filters: FilterPipeline,
}

impl HybridRecommender {
    /// Build a model from the raw tables.
    ///
    /// Validates both tables, builds the interaction matrix and the content
    /// feature matrix, and precomputes the two similarity matrices. Fails
    /// on the first malformed row.
    pub fn build(
        books: Vec<Book>,
        interactions: Vec<Interaction>,
        weights: BlendWeights,
    ) -> Result<Self, BuildError> {
        let catalog = Arc::new(Catalog::from_tables(books, interactions)?);
        let matrix = InteractionMatrix::build(catalog.interactions())?;

        let books: Vec<Book> = catalog.books_in_order().cloned().collect();
        let features = ContentFeatures::build(&books);

        let (n_books, n_users, n_interactions) = catalog.counts();
        info!(
            books = n_books,
            users = n_users,
            interactions = n_interactions,
            "Built hybrid recommendation model"
        );

        Ok(Self {
            collaborative: CollaborativeEngine::new(matrix),
            content: ContentEngine::new(catalog.clone(), features),
            catalog,
            weights,
            filters: FilterPipeline::new().add_filter(AlreadyListenedFilter),
        })
    }

    /// The catalog this model was built on
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configured blend weights
    pub fn weights(&self) -> BlendWeights {
        self.weights
    }

    /// Top `top_n` recommendations for a user.
    ///
    /// Pure function of the built model: the same user and limit always
    /// yield the same list. Per-request engine failures degrade to an empty
    /// contribution from that engine; an unknown user gets an empty list
    /// rather than an error. Returning fewer than `top_n` books is normal
    /// when the eligible candidate pool runs dry.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub fn recommend(&self, user_id: UserId, top_n: usize) -> Vec<Recommendation> {
        let fetch = CANDIDATE_MULTIPLIER * top_n;

        let history = match build_user_history(self.collaborative.matrix(), user_id) {
            Ok(history) => history,
            Err(err) => {
                warn!(%err, "No listening history for user");
                UserHistory::empty(user_id)
            }
        };

        let collaborative_raw = self.collaborative_candidates(user_id, fetch);
        let content_raw = self.content_candidates(&history, fetch);
        info!(
            collaborative = collaborative_raw.len(),
            content = content_raw.len(),
            "Gathered candidates"
        );
        if collaborative_raw.is_empty() && content_raw.is_empty() {
            return Vec::new();
        }

        let collaborative_norm = min_max_normalize(&collaborative_raw);
        let content_norm = min_max_normalize(&content_raw);

        // Union of both candidate sets, deduplicated by construction
        let book_ids: BTreeSet<BookId> = collaborative_norm
            .keys()
            .chain(content_norm.keys())
            .copied()
            .collect();

        let candidates: Vec<Candidate> = book_ids
            .into_iter()
            .map(|book_id| {
                let collaborative_score = collaborative_norm.get(&book_id).copied();
                let content_score = content_norm.get(&book_id).copied();
                Candidate {
                    book_id,
                    score: blend(&self.weights, collaborative_score, content_score),
                    collaborative_score: collaborative_score.unwrap_or(0.0),
                    content_score: content_score.unwrap_or(0.0),
                }
            })
            .collect();

        let mut ranked = match self.filters.apply(candidates, &history) {
            Ok(filtered) => filtered,
            Err(err) => {
                warn!(%err, "Filter pipeline failed, returning nothing");
                return Vec::new();
            }
        };
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.book_id.cmp(&b.book_id))
        });
        ranked.truncate(top_n);

        ranked
            .into_iter()
            .filter_map(|candidate| self.snapshot(candidate))
            .collect()
    }

    /// Collaborative predictions keyed by book id. Unknown users degrade to
    /// an empty contribution.
    fn collaborative_candidates(&self, user_id: UserId, fetch: usize) -> HashMap<BookId, f64> {
        match self.collaborative.predict(user_id, fetch, true) {
            Ok(scored) => scored.into_iter().collect(),
            Err(err) => {
                warn!(%err, "Collaborative engine contributed nothing");
                HashMap::new()
            }
        }
    }

    /// Content candidates seeded by the user's top consumed books. A book
    /// reached through several anchors takes the mean similarity across
    /// them.
    fn content_candidates(&self, history: &UserHistory, fetch: usize) -> HashMap<BookId, f64> {
        let mut sums: HashMap<BookId, (f64, usize)> = HashMap::new();
        for anchor in history.top_books(CONTENT_ANCHORS) {
            match self.content.similar_books(anchor, fetch) {
                Ok(similar) => {
                    for neighbor in similar {
                        let entry = sums.entry(neighbor.book_id).or_insert((0.0, 0));
                        entry.0 += neighbor.score;
                        entry.1 += 1;
                    }
                }
                Err(err) => {
                    warn!(%err, anchor, "Content engine contributed nothing for anchor");
                }
            }
        }
        sums.into_iter()
            .map(|(book_id, (total, anchors))| (book_id, total / anchors as f64))
            .collect()
    }

    /// Attach the display metadata snapshot to a ranked candidate
    fn snapshot(&self, candidate: Candidate) -> Option<Recommendation> {
        let book = self.catalog.get_book(candidate.book_id)?;
        Some(Recommendation {
            book_id: candidate.book_id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            tags: book.tags.clone(),
            hybrid_score: candidate.score,
            collaborative_score: candidate.collaborative_score,
            content_score: candidate.content_score,
        })
    }
}

/// Weighted sum of the two normalized engine scores. A book missing from an
/// engine contributes 0 for that term.
fn blend(weights: &BlendWeights, collaborative: Option<f64>, content: Option<f64>) -> f64 {
    weights.collaborative() * collaborative.unwrap_or(0.0)
        + weights.content() * content.unwrap_or(0.0)
}

/// Min-max scale a score set to [0, 1].
///
/// A set with a single distinct value has no range to scale over; every
/// score maps to 1.0 instead of dividing by zero.
fn min_max_normalize(scores: &HashMap<BookId, f64>) -> HashMap<BookId, f64> {
    let mut values = scores.values();
    let Some(&first) = values.next() else {
        return HashMap::new();
    };
    let (min, max) = values.fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
    let range = max - min;

    scores
        .iter()
        .map(|(&book_id, &score)| {
            let normalized = if range > 0.0 {
                (score - min) / range
            } else {
                1.0
            };
            (book_id, normalized)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_weighted_sum() {
        let weights = BlendWeights::new(0.6, 0.4).unwrap();

        assert!((blend(&weights, Some(1.0), Some(1.0)) - 1.0).abs() < 1e-9);
        assert!((blend(&weights, Some(0.5), Some(0.5)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_blend_missing_engine_scores_zero() {
        // Normalized collaborative 1.0, no content score: exactly the
        // collaborative weight survives
        let weights = BlendWeights::new(0.6, 0.4).unwrap();

        assert!((blend(&weights, Some(1.0), None) - 0.6).abs() < 1e-6);
        assert!((blend(&weights, None, Some(1.0)) - 0.4).abs() < 1e-6);
        assert_eq!(blend(&weights, None, None), 0.0);
    }

    #[test]
    fn test_normalize_scales_to_unit_interval() {
        let scores = HashMap::from([(1, 2.0), (2, 4.0), (3, 6.0)]);
        let normalized = min_max_normalize(&scores);

        assert!((normalized[&1] - 0.0).abs() < 1e-9);
        assert!((normalized[&2] - 0.5).abs() < 1e-9);
        assert!((normalized[&3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_zero_range_maps_to_one() {
        let scores = HashMap::from([(1, 3.3), (2, 3.3)]);
        let normalized = min_max_normalize(&scores);

        assert_eq!(normalized[&1], 1.0);
        assert_eq!(normalized[&2], 1.0);

        let single = min_max_normalize(&HashMap::from([(7, 0.0)]));
        assert_eq!(single[&7], 1.0);
    }

    #[test]
    fn test_normalize_empty_is_empty() {
        assert!(min_max_normalize(&HashMap::new()).is_empty());
    }
}
