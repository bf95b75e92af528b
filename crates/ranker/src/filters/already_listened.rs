//! Filter to remove books the user has already listened to.
//!
//! This runs as the first filter in the pipeline: a book counts as consumed
//! as soon as any interaction was recorded for it, even one with a weighted
//! value of 0.0, so the final list and the user's history stay disjoint.

use crate::traits::Filter;
use crate::types::Candidate;
use anyhow::Result;
use engines::UserHistory;

/// Removes candidates with any recorded interaction for the target user.
///
/// ## Algorithm
/// Uses the HashSet in UserHistory.consumed for O(1) lookups.
pub struct AlreadyListenedFilter;

impl Filter for AlreadyListenedFilter {
    fn name(&self) -> &str {
        "AlreadyListenedFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, history: &UserHistory) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !history.consumed.contains(&candidate.book_id))
            .collect();
        Ok(filtered)
    }
}
