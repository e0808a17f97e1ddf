//! Rich diagnostic error types for book generation.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from coordinate validation and content generation.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("invalid coordinate \"{coordinate}\": {message}")]
    #[diagnostic(
        code(babel::library::invalid_coordinate),
        help(
            "Coordinates have the form hexagon.wall.shelf.volume. The hexagon is any \
             non-negative integer; wall must be 0-5, shelf 0-4 and volume 0-31."
        )
    )]
    InvalidCoordinate { coordinate: String, message: String },

    #[error("failed to generate book at {coordinate}: {message}")]
    #[diagnostic(
        code(babel::library::generation_failure),
        help(
            "The generator could not synthesize this book. This usually means a \
             vocabulary table it draws from is empty; check the vocabulary file."
        )
    )]
    GenerationFailure { coordinate: String, message: String },

    #[error("chapter {ordinal} out of range for {coordinate} ({chapters} chapters)")]
    #[diagnostic(
        code(babel::library::chapter_out_of_range),
        help("Chapter ordinals start at 1. Fetch the book first to see its chapter count.")
    )]
    ChapterOutOfRange {
        coordinate: String,
        ordinal: usize,
        chapters: usize,
    },
}

/// Convenience alias for library operation results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
