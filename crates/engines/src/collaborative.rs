//! Collaborative similarity engine.
//!
//! Scores unseen books for a user from the behavior of similar users:
//! "people whose listening looks like yours finished and rated these".
//!
//! ## Algorithm
//! 1. Precompute the dense user-user cosine matrix over interaction rows
//! 2. For a request, take the K most similar users (self excluded by
//!    identity, never by sort position)
//! 3. Predict each candidate book as the similarity-weighted average of the
//!    neighbors' cell values, weights being similarity magnitudes
//! 4. Drop consumed books before ranking when asked to, so the returned
//!    top-N is exactly N previously-unseen books (or fewer)

use crate::error::EngineError;
use crate::interactions::InteractionMatrix;
use crate::similarity::pairwise_cosine;
use catalog::{BookId, UserId};
use tracing::{debug, instrument};

/// Default neighborhood size for predictions
const DEFAULT_NEIGHBORHOOD: usize = 10;

/// User-user collaborative filtering over the interaction matrix.
///
/// The similarity matrix is computed once at construction and never
/// mutated; rebuilds happen by constructing a fresh engine.
pub struct CollaborativeEngine {
    matrix: InteractionMatrix,
    user_similarity: Vec<Vec<f64>>,

    /// How many similar users feed each prediction
    neighborhood_size: usize,
}

impl CollaborativeEngine {
    /// Build the engine, precomputing the full user-user similarity matrix
    pub fn new(matrix: InteractionMatrix) -> Self {
        let user_similarity = pairwise_cosine(matrix.matrix());
        debug!(
            users = matrix.n_users(),
            books = matrix.n_books(),
            "Computed user-user similarity matrix"
        );
        Self {
            matrix,
            user_similarity,
            neighborhood_size: DEFAULT_NEIGHBORHOOD,
        }
    }

    /// Configure the prediction neighborhood size (default: 10)
    pub fn with_neighborhood_size(mut self, size: usize) -> Self {
        self.neighborhood_size = size;
        self
    }

    /// The interaction matrix this engine was built on
    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    /// The `n` users most similar to `user_id`, descending by similarity,
    /// ties by ascending user id. The target user is excluded by identity:
    /// another user with similarity 1.0 is a legitimate neighbor and stays.
    pub fn similar_users(
        &self,
        user_id: UserId,
        n: usize,
    ) -> Result<Vec<(UserId, f64)>, EngineError> {
        let row = self
            .matrix
            .row_of(user_id)
            .ok_or(EngineError::UnknownUser(user_id))?;

        let mut neighbors: Vec<(UserId, f64)> = self.user_similarity[row]
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != row)
            .filter_map(|(other, &sim)| self.matrix.user_at(other).map(|id| (id, sim)))
            .collect();

        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        neighbors.truncate(n);
        Ok(neighbors)
    }

    /// Predict scores for books the user has not consumed.
    ///
    /// Returns up to `top_n` (book id, predicted score) pairs, descending
    /// by score, ties by ascending book id. With `exclude_consumed` the
    /// user's consumed books are removed from the candidate set before
    /// ranking. A zero total neighbor weight predicts 0.0 instead of
    /// dividing by zero.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub fn predict(
        &self,
        user_id: UserId,
        top_n: usize,
        exclude_consumed: bool,
    ) -> Result<Vec<(BookId, f64)>, EngineError> {
        let row = self
            .matrix
            .row_of(user_id)
            .ok_or(EngineError::UnknownUser(user_id))?;

        let neighbors = self.similar_users(user_id, self.neighborhood_size)?;
        debug!("Predicting from {} neighbors", neighbors.len());

        let mut weighted_sum = vec![0.0_f64; self.matrix.n_books()];
        let mut weight_total = 0.0_f64;
        for (neighbor_id, sim) in &neighbors {
            let Some(neighbor_row) = self.matrix.row_of(*neighbor_id) else {
                continue;
            };
            if let Some(values) = self.matrix.matrix().outer_view(neighbor_row) {
                for (col, &value) in values.iter() {
                    weighted_sum[col] += sim * value;
                }
            }
            weight_total += sim.abs();
        }

        let consumed: Vec<bool> = (0..self.matrix.n_books())
            .map(|col| self.matrix.matrix().get(row, col).is_some())
            .collect();

        let mut predictions: Vec<(BookId, f64)> = (0..self.matrix.n_books())
            .filter(|&col| !(exclude_consumed && consumed[col]))
            .filter_map(|col| {
                let score = if weight_total > 0.0 {
                    weighted_sum[col] / weight_total
                } else {
                    0.0
                };
                self.matrix.book_at(col).map(|id| (id, score))
            })
            .collect();

        predictions.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        predictions.truncate(top_n);
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Interaction;

    fn row(user_id: UserId, book_id: BookId, progress: f32, rating: Option<f32>) -> Interaction {
        Interaction {
            user_id,
            book_id,
            progress,
            rating,
            timestamp: 1_000_000,
        }
    }

    /// Users 1 and 2 listen to the same books with proportional weights,
    /// user 3 listens to something else entirely.
    fn build_engine() -> CollaborativeEngine {
        let matrix = InteractionMatrix::build(&[
            row(1, 10, 100.0, Some(4.0)),
            row(1, 11, 100.0, Some(2.0)),
            row(2, 10, 100.0, Some(2.0)),
            row(2, 11, 100.0, Some(1.0)),
            row(2, 12, 100.0, Some(5.0)),
            row(3, 20, 100.0, Some(5.0)),
        ])
        .unwrap();
        CollaborativeEngine::new(matrix)
    }

    #[test]
    fn test_similar_users_excludes_self_by_identity() {
        let engine = build_engine();
        let similar = engine.similar_users(1, 10).unwrap();

        assert!(similar.iter().all(|&(id, _)| id != 1));
        // User 2 shares books with user 1, user 3 does not
        assert_eq!(similar.first().map(|&(id, _)| id), Some(2));
    }

    #[test]
    fn test_perfectly_aligned_neighbor_is_kept() {
        // User 2's row is an exact multiple of user 1's: cosine 1.0.
        // Excluding by sort position would wrongly drop it.
        let matrix = InteractionMatrix::build(&[
            row(1, 10, 100.0, Some(2.0)),
            row(1, 11, 100.0, Some(4.0)),
            row(2, 10, 50.0, Some(2.0)),
            row(2, 11, 50.0, Some(4.0)),
        ])
        .unwrap();
        let engine = CollaborativeEngine::new(matrix);

        let similar = engine.similar_users(1, 5).unwrap();
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].0, 2);
        assert!((similar[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_excludes_consumed_before_ranking() {
        let engine = build_engine();
        let predictions = engine.predict(1, 10, true).unwrap();

        let ids: Vec<BookId> = predictions.iter().map(|&(id, _)| id).collect();
        assert!(!ids.contains(&10));
        assert!(!ids.contains(&11));
        // Book 12 comes from neighbor 2
        assert!(ids.contains(&12));
    }

    #[test]
    fn test_predict_keeps_consumed_when_asked() {
        let engine = build_engine();
        let predictions = engine.predict(1, 10, false).unwrap();

        let ids: Vec<BookId> = predictions.iter().map(|&(id, _)| id).collect();
        assert!(ids.contains(&10));
    }

    #[test]
    fn test_predict_sorted_descending() {
        let engine = build_engine();
        let predictions = engine.predict(1, 10, true).unwrap();

        for pair in predictions.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_isolated_user_predicts_zero() {
        // User 3 shares no books with anyone: every neighbor similarity is
        // 0, so the total weight is 0 and predictions default to 0.0.
        let engine = build_engine();
        let predictions = engine.predict(3, 10, true).unwrap();

        assert!(predictions.iter().all(|&(_, score)| score == 0.0));
    }

    #[test]
    fn test_unknown_user_is_an_error() {
        let engine = build_engine();

        assert_eq!(
            engine.similar_users(999, 5).unwrap_err(),
            EngineError::UnknownUser(999)
        );
        assert_eq!(
            engine.predict(999, 5, true).unwrap_err(),
            EngineError::UnknownUser(999)
        );
    }
}
