//! Query analysis: classify query tokens against the vocabulary.

use unicode_normalization::UnicodeNormalization;

use crate::error::{SearchError, SearchResult};
use crate::search::types::{QueryAnalysis, QueryType};
use crate::vocabulary::{TermKind, Vocabulary};

/// Split a query into classified terms and derive its type and complexity.
///
/// The query is NFKC-normalized and lowercased, split on whitespace, and each
/// token is stripped of surrounding punctuation. Empty or whitespace-only
/// queries are rejected before any other work.
pub fn analyze(query: &str, vocab: &Vocabulary) -> SearchResult<QueryAnalysis> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery {
            message: "query is empty or whitespace-only".into(),
        });
    }

    let normalized: String = query.nfkc().collect::<String>().to_lowercase();
    let raw_tokens: Vec<&str> = normalized.split_whitespace().collect();
    let word_count = raw_tokens.len();

    let mut concepts = Vec::new();
    let mut fields = Vec::new();
    let mut adjectives = Vec::new();
    let mut unknown_terms = Vec::new();

    for raw in raw_tokens {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            continue;
        }
        let bucket = match vocab.classify(token) {
            Some(TermKind::Concept) => &mut concepts,
            Some(TermKind::Field) => &mut fields,
            Some(TermKind::Adjective) => &mut adjectives,
            None => &mut unknown_terms,
        };
        if !bucket.iter().any(|t: &String| t == token) {
            bucket.push(token.to_string());
        }
    }

    let query_type = if concepts.len() > 2 {
        QueryType::Conceptual
    } else if !fields.is_empty() {
        QueryType::Academic
    } else if adjectives.len() > 1 {
        QueryType::Qualitative
    } else {
        QueryType::General
    };

    let complexity =
        0.1 * word_count as f32 + 0.3 * concepts.len() as f32 + 0.2 * fields.len() as f32;

    Ok(QueryAnalysis {
        original_query: query.to_string(),
        concepts,
        fields,
        adjectives,
        unknown_terms,
        query_type,
        complexity,
    })
}
