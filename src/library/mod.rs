//! The infinite library: books generated on demand from their coordinates.
//!
//! Nothing here is stored. A book exists only while a caller holds the value
//! returned by [`ContentGenerator::generate`]; asking again for the same
//! coordinate yields the same book.

pub mod error;
pub mod generator;
pub mod model;

pub use error::{LibraryError, LibraryResult};
pub use generator::{random_coordinate, ContentGenerator};
pub use model::{BibliographyEntry, Book, Chapter};
