//! Candidate scoring: relevance, quality and novelty.
//!
//! All three scorers are pure functions of a candidate (and, for relevance,
//! the query analysis). Each returns a value in `[0, 1]`, and so does the
//! weighted [`final_score`].

use std::sync::LazyLock;

use regex::Regex;

use crate::library::model::Book;
use crate::search::types::{Candidate, QueryAnalysis, ScoredBook};

// Interior hyphens stay inside a word, matching how query terms are tokenized.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*").unwrap());

pub const CONCEPT_WEIGHT: f32 = 1.0;
pub const FIELD_WEIGHT: f32 = 0.8;
pub const ADJECTIVE_WEIGHT: f32 = 0.6;

/// Weighted query terms matched against candidate text.
#[derive(Debug, Clone)]
pub struct TermWeights {
    terms: Vec<(String, f32)>,
}

impl TermWeights {
    pub fn from_analysis(analysis: &QueryAnalysis) -> Self {
        let weighted = |terms: &[String], weight: f32| {
            terms
                .iter()
                .map(move |t| (t.clone(), weight))
                .collect::<Vec<_>>()
        };
        let mut terms = weighted(&analysis.concepts, CONCEPT_WEIGHT);
        terms.extend(weighted(&analysis.fields, FIELD_WEIGHT));
        terms.extend(weighted(&analysis.adjectives, ADJECTIVE_WEIGHT));
        Self { terms }
    }

    /// Match score of `text`: a whole-word hit earns the term's weight, a
    /// substring-only hit half of it; the sum is divided by the term count.
    pub fn match_text(&self, text: &str) -> f32 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let lower = text.to_lowercase();
        let words: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();

        let total: f32 = self
            .terms
            .iter()
            .map(|(term, weight)| {
                if words.iter().any(|w| *w == term.as_str()) {
                    *weight
                } else if lower.contains(term.as_str()) {
                    weight * 0.5
                } else {
                    0.0
                }
            })
            .sum();
        total / self.terms.len() as f32
    }
}

/// Relevance of a candidate to the query.
pub fn relevance(book: &Book, coordinate_relevance: f32, terms: &TermWeights) -> f32 {
    let title = terms.match_text(&book.title);
    let abstract_score = terms.match_text(&book.abstract_text);
    let chapters = if book.chapters.is_empty() {
        0.0
    } else {
        book.chapters
            .iter()
            .map(|c| terms.match_text(&c.title))
            .sum::<f32>()
            / book.chapters.len() as f32
    };
    (0.4 * title + 0.3 * abstract_score + 0.2 * chapters + 0.1 * coordinate_relevance)
        .clamp(0.0, 1.0)
}

/// Intrinsic quality of a book from its shape and age.
pub fn quality(book: &Book, current_year: i32) -> f32 {
    let words = book.word_count;
    let word_bonus = if (2_000..=10_000).contains(&words) {
        0.3
    } else if (1_000..=15_000).contains(&words) {
        0.2
    } else {
        0.1
    };

    let chapters = book.chapters.len();
    let chapter_bonus = if (6..=15).contains(&chapters) {
        0.3
    } else if (3..=20).contains(&chapters) {
        0.2
    } else {
        0.1
    };

    let citations = book.bibliography.len();
    let bibliography_bonus = if (5..=20).contains(&citations) {
        0.2
    } else if (2..=30).contains(&citations) {
        0.1
    } else {
        0.0
    };

    let age = i64::from(current_year) - i64::from(book.publication_year);
    let recency_bonus = if age <= 10 {
        0.2
    } else if age <= 50 {
        0.1
    } else {
        0.0
    };

    f32::clamp(
        word_bonus + chapter_bonus + bibliography_bonus + recency_bonus,
        0.0,
        1.0,
    )
}

/// Spread along the hexagon axis, in `[0, 1)`.
pub fn novelty(book: &Book) -> f32 {
    (book.coordinate.hexagon % 1000) as f32 / 1000.0
}

/// Weighted combination of the three scores.
pub fn final_score(relevance: f32, quality: f32, novelty: f32) -> f32 {
    0.6 * relevance + 0.3 * quality + 0.1 * novelty
}

/// Score one candidate.
pub fn score(candidate: Candidate, terms: &TermWeights, current_year: i32) -> ScoredBook {
    let relevance_score = relevance(&candidate.book, candidate.coordinate_relevance, terms);
    let quality_score = quality(&candidate.book, current_year);
    let novelty_score = novelty(&candidate.book);
    ScoredBook {
        final_score: final_score(relevance_score, quality_score, novelty_score),
        coordinate_relevance: candidate.coordinate_relevance,
        search_source: candidate.search_source,
        relevance_score,
        quality_score,
        novelty_score,
        book: candidate.book,
    }
}
