//! Error types for the similarity engines.

use catalog::{BookId, UserId};
use thiserror::Error;

/// Per-request lookup failures.
///
/// These are not fatal to the model: the hybrid layer recovers from them by
/// treating the failing engine's contribution as empty. They only surface
/// to callers who talk to an engine directly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The user id has no row in the interaction matrix
    #[error("Unknown user id {0}")]
    UnknownUser(UserId),

    /// The book id has no row in the content feature matrix
    #[error("Unknown book id {0}")]
    UnknownBook(BookId),
}
