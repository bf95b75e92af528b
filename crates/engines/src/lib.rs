//! # Engines Crate
//!
//! This crate implements the two scoring models behind audiobook
//! recommendations, plus the matrices they are built on.
//!
//! ## Components
//!
//! ### Collaborative Engine
//! User-user filtering over the interaction matrix:
//! - "Listeners whose history looks like yours also finished..."
//! - Predicts unseen-book scores from the K most similar users
//!
//! ### Content Engine
//! Item-item similarity over book metadata features:
//! - TF-IDF text, one-hot genre, scaled duration
//! - Retrieves the nearest neighbors of an anchor book, with optional
//!   human-readable explanations
//!
//! ## Example Usage
//!
//! ```ignore
//! use engines::{CollaborativeEngine, ContentEngine, ContentFeatures, InteractionMatrix};
//! use std::sync::Arc;
//!
//! let matrix = InteractionMatrix::build(catalog.interactions())?;
//! let features = ContentFeatures::build(&books);
//!
//! let collaborative = CollaborativeEngine::new(matrix);
//! let content = ContentEngine::new(Arc::new(catalog), features);
//!
//! let predictions = collaborative.predict(user_id, 10, true)?;
//! let neighbors = content.similar_books(book_id, 10)?;
//! ```
//!
//! Both engines precompute their dense similarity matrix at construction
//! and are immutable afterwards, so a built engine can be shared behind an
//! `Arc` by any number of concurrent readers. Reloading data means building
//! a fresh engine and swapping the reference.

// Public modules
pub mod collaborative;
pub mod content;
pub mod error;
pub mod features;
pub mod history;
pub mod interactions;
pub mod text;

mod similarity;

// Re-export commonly used types
pub use collaborative::CollaborativeEngine;
pub use content::{ContentEngine, SimilarBook};
pub use error::EngineError;
pub use features::ContentFeatures;
pub use history::{UserHistory, build_user_history};
pub use interactions::InteractionMatrix;
pub use text::TfIdfVectorizer;
