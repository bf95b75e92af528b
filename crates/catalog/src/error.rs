//! Error types for catalog construction and validation.

use thiserror::Error;

/// Errors raised while building a catalog from raw tables.
///
/// All of these are fatal to the build step: a model must never be
/// constructed on top of a half-validated table pair.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A required text field was empty
    #[error("Missing required field '{field}' on book {book_id}")]
    MissingField { field: String, book_id: u32 },

    /// A data field had a value outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// An interaction references a book that is not in the book table
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
