//! Rich diagnostic error types for babel-stacks.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly which input was
//! rejected and why.

use miette::Diagnostic;
use thiserror::Error;

pub use crate::library::error::LibraryError;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BabelError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Search errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SearchError {
    #[error("invalid query: {message}")]
    #[diagnostic(
        code(babel::search::invalid_query),
        help("Provide at least one non-whitespace word to search for.")
    )]
    InvalidQuery { message: String },

    #[error("search cancelled after {explored} candidate(s)")]
    #[diagnostic(
        code(babel::search::cancelled),
        help("The caller cancelled this search. Re-run it to get results.")
    )]
    Cancelled { explored: usize },

    #[error("worker pool error: {message}")]
    #[diagnostic(
        code(babel::search::worker_pool),
        help(
            "The generation worker pool could not be created. \
             Lower `worker_threads` in the configuration or leave it at 0."
        )
    )]
    WorkerPool { message: String },

    #[error("invalid search options: {message}")]
    #[diagnostic(
        code(babel::search::invalid_options),
        help("`diversity_weight` must be a finite, non-negative number.")
    )]
    InvalidOptions { message: String },
}

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {path}")]
    #[diagnostic(
        code(babel::vocabulary::io),
        help("Ensure the vocabulary file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vocabulary \"{origin}\": {message}")]
    #[diagnostic(
        code(babel::vocabulary::parse),
        help(
            "Check the TOML syntax. A vocabulary needs [meta], [terms], [names] \
             and [content] tables."
        )
    )]
    Parse { origin: String, message: String },

    #[error("vocabulary table \"{table}\" is empty")]
    #[diagnostic(
        code(babel::vocabulary::empty_table),
        help("Every vocabulary table needs at least one entry for generation to be total.")
    )]
    EmptyTable { table: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(babel::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(babel::config::parse),
        help("Check the TOML syntax in the config file. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(babel::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(babel::config::invalid), help("Check the configuration fields. {message}"))]
    InvalidValue { message: String },
}

/// Convenience alias for functions returning babel-stacks results.
pub type BabelResult<T> = std::result::Result<T, BabelError>;

/// Convenience alias for search results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
