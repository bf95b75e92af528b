//! Filter implementations for the candidate pipeline.
//!
//! This module contains the concrete filter implementations that can be
//! composed into a FilterPipeline.

pub mod already_listened;

// Re-export for convenience
pub use already_listened::AlreadyListenedFilter;
