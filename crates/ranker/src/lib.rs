//! # Ranker Crate
//!
//! The hybrid combiner: takes both similarity engines and turns their raw
//! scores into one ranked recommendation list.
//!
//! ## Pipeline
//! 1. Fetch candidates from the collaborative and content engines
//! 2. Normalize each engine's scores independently to [0, 1]
//! 3. Blend with validated weights
//! 4. Filter out books the user already listened to
//! 5. Rank deterministically and attach display metadata
//!
//! ## Example Usage
//! ```ignore
//! use ranker::{BlendWeights, HybridRecommender};
//!
//! let weights = BlendWeights::new(0.6, 0.4)?;
//! let model = HybridRecommender::build(books, interactions, weights)?;
//!
//! for rec in model.recommend(user_id, 10) {
//!     println!("{} ({:.3})", rec.title, rec.hybrid_score);
//! }
//! ```
//!
//! The model is an immutable snapshot. To pick up new data, build a fresh
//! one and swap the shared reference; in-flight readers keep the snapshot
//! they started with.

pub mod blend;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;
pub mod types;
pub mod weights;

// Re-export main types
pub use blend::{BuildError, HybridRecommender};
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
pub use types::{Candidate, Recommendation};
pub use weights::{BlendWeights, ConfigError};
