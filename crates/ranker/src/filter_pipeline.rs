//! The FilterPipeline chains multiple filters together.
//!
//! Filters run in insertion order over the candidate set, with per-filter
//! debug logging of input and output counts.

use crate::traits::Filter;
use crate::types::Candidate;
use anyhow::Result;
use engines::UserHistory;
use tracing::debug;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new().add_filter(AlreadyListenedFilter);
/// let filtered = pipeline.apply(candidates, &history)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// Fails on the first filter that fails; the partial result is dropped.
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        history: &UserHistory,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, history)?;
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
