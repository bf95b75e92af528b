//! # Catalog Crate
//!
//! This crate holds the audiobook domain model and the in-memory store the
//! scoring layers are built on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Book, Interaction, Catalog)
//! - **index**: Assemble and validate a catalog from raw tables
//! - **error**: Error types for catalog construction
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//!
//! // The caller supplies both tables as plain rows
//! let catalog = Catalog::from_tables(books, interactions)?;
//!
//! // Query data
//! let book = catalog.get_book(17).unwrap();
//! let history = catalog.get_user_interactions(1);
//!
//! println!("{} has {} interactions", book.title, history.len());
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Book, BookId, Catalog, Interaction, UserId};
