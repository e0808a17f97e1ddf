//! Data types shared by the search pipeline stages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{SearchError, SearchResult};
use crate::library::model::Book;

/// Broad shape of a query, derived from its term counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Conceptual,
    Academic,
    Qualitative,
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conceptual => "conceptual",
            Self::Academic => "academic",
            Self::Qualitative => "qualitative",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified query terms.
///
/// Each term list is deduplicated and keeps first-seen query order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub original_query: String,
    pub concepts: Vec<String>,
    pub fields: Vec<String>,
    pub adjectives: Vec<String>,
    pub unknown_terms: Vec<String>,
    pub query_type: QueryType,
    pub complexity: f32,
}

impl QueryAnalysis {
    /// Number of recognized terms (concepts, fields and adjectives).
    pub fn term_count(&self) -> usize {
        self.concepts.len() + self.fields.len() + self.adjectives.len()
    }
}

/// Why a coordinate entered the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Concept,
    Field,
    Exploration,
    Adjacent,
}

impl std::fmt::Display for SearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Concept => "concept",
            Self::Field => "field",
            Self::Exploration => "exploration",
            Self::Adjacent => "adjacent",
        })
    }
}

/// A coordinate proposed by the mapper, with its prior relevance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCoordinate {
    pub coordinate: Coordinate,
    pub source: SearchSource,
    pub base_relevance: f32,
}

/// A generated book awaiting scores.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub book: Book,
    pub coordinate_relevance: f32,
    pub search_source: SearchSource,
}

/// A search result: the book plus its score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBook {
    #[serde(flatten)]
    pub book: Book,
    pub coordinate_relevance: f32,
    pub search_source: SearchSource,
    pub relevance_score: f32,
    pub quality_score: f32,
    pub novelty_score: f32,
    /// Weighted score; after the diversity pass this may exceed 1.0.
    pub final_score: f32,
}

/// How exploration coordinates get their prior relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Relevance derived from the query hash; rankings are reproducible.
    #[default]
    Deterministic,
    /// Relevance drawn per call; only the candidate set is reproducible.
    Serendipitous,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deterministic" => Ok(Self::Deterministic),
            "serendipitous" => Ok(Self::Serendipitous),
            other => Err(format!(
                "unknown search mode \"{other}\" (expected deterministic or serendipitous)"
            )),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Deterministic => "deterministic",
            Self::Serendipitous => "serendipitous",
        })
    }
}

/// Per-call search options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub max_results: usize,
    pub diversity_weight: f32,
    pub mode: SearchMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            diversity_weight: 0.7,
            mode: SearchMode::default(),
        }
    }
}

impl SearchOptions {
    /// Reject a diversity weight that is negative or not finite.
    pub fn validate(&self) -> SearchResult<()> {
        if !self.diversity_weight.is_finite() || self.diversity_weight < 0.0 {
            return Err(SearchError::InvalidOptions {
                message: format!(
                    "diversity_weight must be a non-negative number, got {}",
                    self.diversity_weight
                ),
            });
        }
        Ok(())
    }
}

/// Bookkeeping returned alongside search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Candidate books actually generated.
    pub total_explored: usize,
    /// Mapped coordinates that seeded exploration.
    pub search_space_size: usize,
    pub query_analysis: QueryAnalysis,
    pub mode: SearchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredBook>,
    pub metadata: SearchMetadata,
}

/// Cooperative cancellation flag shared between a caller and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
