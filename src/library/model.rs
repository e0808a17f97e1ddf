//! Core data types for generated books.
//!
//! A book is an immutable value derived purely from its coordinate. Chapter
//! bodies are not stored; they are synthesized on request from the same seed.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// A fully-formed book occupying one coordinate of the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Canonical `"hex.wall.shelf.vol"` identifier.
    pub id: String,
    pub coordinate: Coordinate,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub genre: String,
    pub publication_year: u32,
    /// Sum of the chapter word counts.
    pub word_count: u32,
    pub chapters: Vec<Chapter>,
    pub bibliography: Vec<BibliographyEntry>,
}

impl Book {
    /// Look up a chapter by its 1-based ordinal.
    pub fn chapter(&self, ordinal: usize) -> Option<&Chapter> {
        ordinal
            .checked_sub(1)
            .and_then(|idx| self.chapters.get(idx))
    }
}

/// One chapter heading of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// 1-based position within the book.
    pub ordinal: usize,
    pub word_count: u32,
}

/// A cited work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub author: String,
    pub title: String,
    pub year: u32,
    pub publisher: String,
}

impl std::fmt::Display for BibliographyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}). {}. {}.",
            self.author, self.year, self.title, self.publisher
        )
    }
}
