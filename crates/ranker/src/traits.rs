//! Core traits for the candidate filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use crate::types::Candidate;
use anyhow::Result;
use engines::UserHistory;

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec,
///   so transformations do not clone the candidate set
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `history` - The target user's listening history
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates
    /// * `Err` - If filtering fails
    fn apply(&self, candidates: Vec<Candidate>, history: &UserHistory) -> Result<Vec<Candidate>>;
}
