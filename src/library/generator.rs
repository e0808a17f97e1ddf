//! Coordinate-to-content generation.
//!
//! `ContentGenerator::generate` is a pure function of the coordinate and the
//! vocabulary: it derives a seed from the coordinate hash, then walks a
//! [`DrawStream`] through the vocabulary tables to pick every title, name,
//! year and count. Nothing is cached or stored.

use std::sync::Arc;

use rand::Rng;

use crate::coordinate::{Coordinate, SHELVES, VOLUMES, WALLS};
use crate::hash::{hash, DrawStream};
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::{BibliographyEntry, Book, Chapter};
use crate::vocabulary::Vocabulary;

/// Earliest generated publication year.
pub const EARLIEST_YEAR: u32 = 1950;
/// Earliest year a bibliography entry may cite.
pub const EARLIEST_CITED_YEAR: u32 = 1850;
pub const MIN_CHAPTERS: u32 = 6;
pub const MAX_CHAPTERS: u32 = 15;
pub const MIN_CHAPTER_WORDS: u32 = 200;
pub const MAX_CHAPTER_WORDS: u32 = 2000;
pub const MIN_BIBLIOGRAPHY: u32 = 2;
pub const MAX_BIBLIOGRAPHY: u32 = 30;

/// Upper bound of the hexagon axis used for random coordinates.
pub const RANDOM_HEXAGON_SPAN: u64 = 1_000_000;

/// Seed for a coordinate: its id hash combined with the four axes.
pub fn seed_for(coord: &Coordinate) -> u64 {
    u64::from(hash(&coord.id()))
        .wrapping_mul(31)
        .wrapping_add(coord.hexagon)
        .wrapping_add(u64::from(coord.wall) * 7)
        .wrapping_add(u64::from(coord.shelf) * 131)
        .wrapping_add(u64::from(coord.volume) * 1031)
}

/// Draw a uniformly random valid coordinate.
pub fn random_coordinate<R: Rng + ?Sized>(rng: &mut R) -> Coordinate {
    Coordinate::wrapping(
        rng.gen_range(0..RANDOM_HEXAGON_SPAN),
        u64::from(rng.gen_range(0..WALLS)),
        u64::from(rng.gen_range(0..SHELVES)),
        u64::from(rng.gen_range(0..VOLUMES)),
    )
}

/// Deterministic book generator over a shared vocabulary.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    vocab: Arc<Vocabulary>,
}

impl ContentGenerator {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Generate the book at `coord`.
    pub fn generate(&self, coord: &Coordinate) -> LibraryResult<Book> {
        coord.validate()?;
        let id = coord.id();
        let mut synth = Synth::new(&self.vocab, seed_for(coord), &id);

        let title = synth.fill_from("content.title_templates", &self.vocab.title_templates)?;
        let author = synth.author()?;
        let genre = synth.pick("content.genres", &self.vocab.genres)?.to_string();
        let latest = self.vocab.latest_year.max(EARLIEST_YEAR);
        let publication_year = synth.draws.range(EARLIEST_YEAR, latest);

        let chapter_count = synth.draws.range(MIN_CHAPTERS, MAX_CHAPTERS) as usize;
        let mut chapters = Vec::with_capacity(chapter_count);
        for ordinal in 1..=chapter_count {
            let title =
                synth.fill_from("content.chapter_templates", &self.vocab.chapter_templates)?;
            let word_count = synth.draws.range(MIN_CHAPTER_WORDS, MAX_CHAPTER_WORDS);
            chapters.push(Chapter {
                title,
                ordinal,
                word_count,
            });
        }
        let word_count = chapters.iter().map(|c| c.word_count).sum();

        let sentence_count = synth.draws.range(2, 4);
        let mut sentences = Vec::with_capacity(sentence_count as usize);
        for _ in 0..sentence_count {
            sentences
                .push(synth.fill_from("content.abstract_templates", &self.vocab.abstract_templates)?);
        }
        let abstract_text = sentences.join(" ");

        let entry_count = synth.draws.range(MIN_BIBLIOGRAPHY, MAX_BIBLIOGRAPHY);
        let mut bibliography = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            bibliography.push(synth.citation(publication_year)?);
        }

        Ok(Book {
            id,
            coordinate: *coord,
            title,
            author,
            abstract_text,
            genre,
            publication_year,
            word_count,
            chapters,
            bibliography,
        })
    }

    /// Synthesize the prose body of chapter `ordinal` (1-based) of the book at `coord`.
    ///
    /// The text is at least as long as the chapter's word count and overshoots
    /// by at most one sentence.
    pub fn chapter_text(&self, coord: &Coordinate, ordinal: usize) -> LibraryResult<String> {
        let book = self.generate(coord)?;
        let chapter = book
            .chapter(ordinal)
            .ok_or_else(|| LibraryError::ChapterOutOfRange {
                coordinate: book.id.clone(),
                ordinal,
                chapters: book.chapters.len(),
            })?;

        let seed = u64::from(hash(&format!("{}:chapter:{ordinal}", seed_for(coord))));
        let mut synth = Synth::new(&self.vocab, seed, &book.id);
        let target = chapter.word_count as usize;

        let mut paragraphs = Vec::new();
        let mut words = 0;
        while words < target {
            let sentences_in_paragraph = synth.draws.range(4, 7);
            let mut paragraph = Vec::with_capacity(sentences_in_paragraph as usize);
            for _ in 0..sentences_in_paragraph {
                if words >= target {
                    break;
                }
                let sentence =
                    synth.fill_from("content.prose_templates", &self.vocab.prose_templates)?;
                let sentence_words = sentence.split_whitespace().count();
                if sentence_words == 0 {
                    return Err(synth.failure("prose template produced no words"));
                }
                words += sentence_words;
                paragraph.push(sentence);
            }
            paragraphs.push(paragraph.join(" "));
        }
        Ok(paragraphs.join("\n\n"))
    }
}

/// One generation pass: the draw stream plus the tables it draws from.
struct Synth<'a> {
    vocab: &'a Vocabulary,
    draws: DrawStream,
    coordinate: &'a str,
}

impl<'a> Synth<'a> {
    fn new(vocab: &'a Vocabulary, seed: u64, coordinate: &'a str) -> Self {
        Self {
            vocab,
            draws: DrawStream::new(seed),
            coordinate,
        }
    }

    fn failure(&self, message: impl Into<String>) -> LibraryError {
        LibraryError::GenerationFailure {
            coordinate: self.coordinate.to_string(),
            message: message.into(),
        }
    }

    fn pick<'t>(&mut self, table: &str, items: &'t [String]) -> LibraryResult<&'t str> {
        match self.draws.pick(items) {
            Some(item) => Ok(item.as_str()),
            None => Err(self.failure(format!("vocabulary table \"{table}\" is empty"))),
        }
    }

    fn author(&mut self) -> LibraryResult<String> {
        let vocab = self.vocab;
        let first = self.pick("names.first", &vocab.first_names)?;
        let last = self.pick("names.last", &vocab.last_names)?;
        // One author in four carries a middle initial.
        if self.draws.next_u32() % 4 == 0 {
            let initial = char::from(b'A' + (self.draws.next_u32() % 26) as u8);
            Ok(format!("{first} {initial}. {last}"))
        } else {
            Ok(format!("{first} {last}"))
        }
    }

    fn citation(&mut self, citing_year: u32) -> LibraryResult<BibliographyEntry> {
        let vocab = self.vocab;
        let first = self.pick("names.first", &vocab.first_names)?;
        let last = self.pick("names.last", &vocab.last_names)?;
        let initial = first.chars().next().unwrap_or('X');
        let title = self.fill_from("content.title_templates", &vocab.title_templates)?;
        let year = self.draws.range(EARLIEST_CITED_YEAR, citing_year);
        let publisher = self.pick("content.publishers", &vocab.publishers)?.to_string();
        Ok(BibliographyEntry {
            author: format!("{last}, {initial}."),
            title,
            year,
            publisher,
        })
    }

    fn fill_from(&mut self, table: &str, templates: &[String]) -> LibraryResult<String> {
        let template = self.pick(table, templates)?;
        self.fill(template)
    }

    /// Expand `{concept}`-style placeholders; a capitalized key capitalizes the word.
    fn fill(&mut self, template: &str) -> LibraryResult<String> {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let key = &after[..end];
            match self.placeholder(key)? {
                Some(word) => out.push_str(&word),
                None => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn placeholder(&mut self, key: &str) -> LibraryResult<Option<String>> {
        let vocab = self.vocab;
        let (table, items) = match key.to_ascii_lowercase().as_str() {
            "concept" => ("terms.concepts", &vocab.concepts),
            "field" => ("terms.fields", &vocab.fields),
            "adjective" => ("terms.adjectives", &vocab.adjectives),
            _ => return Ok(None),
        };
        let word = self.pick(table, items)?;
        let capitalized = key.starts_with(|c: char| c.is_ascii_uppercase());
        Ok(Some(if capitalized {
            capitalize_words(word)
        } else {
            word.to_string()
        }))
    }
}

/// Capitalize each hyphen- or space-separated part of a word.
fn capitalize_words(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if at_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_start = c == '-' || c == ' ';
    }
    out
}
