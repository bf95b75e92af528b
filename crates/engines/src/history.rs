//! Per-user listening history snapshots.
//!
//! Aggregates one user's side of the interaction matrix into a small struct
//! the ranking layer can query cheaply: the consumed-book set for O(1)
//! filtering and the user's books ranked by weighted interaction value for
//! anchor selection.

use crate::error::EngineError;
use crate::interactions::InteractionMatrix;
use catalog::{BookId, UserId};
use std::collections::HashSet;

/// Snapshot of one user's recorded listening history.
#[derive(Debug, Clone)]
pub struct UserHistory {
    pub user_id: UserId,
    /// Every book with any recorded interaction, zero-valued ones included
    pub consumed: HashSet<BookId>,
    /// (book id, weighted value), descending by value, ties by book id
    pub ranked: Vec<(BookId, f64)>,
}

impl UserHistory {
    /// An empty history, used when the user is absent from the matrix
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            consumed: HashSet::new(),
            ranked: Vec::new(),
        }
    }

    /// The user's top `n` books by weighted interaction value
    pub fn top_books(&self, n: usize) -> Vec<BookId> {
        self.ranked.iter().take(n).map(|&(id, _)| id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

/// Build a [`UserHistory`] from the interaction matrix.
///
/// Fails when the user has no row in the matrix; callers that want to
/// degrade instead use [`UserHistory::empty`].
pub fn build_user_history(
    matrix: &InteractionMatrix,
    user_id: UserId,
) -> Result<UserHistory, EngineError> {
    if matrix.row_of(user_id).is_none() {
        return Err(EngineError::UnknownUser(user_id));
    }

    let mut ranked = matrix.user_books(user_id);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(UserHistory {
        user_id,
        consumed: ranked.iter().map(|&(id, _)| id).collect(),
        ranked,
    })
}
