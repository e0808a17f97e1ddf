//! Bounded-space search over the infinite library.
//!
//! The pipeline runs query → [`analyzer`] → [`mapper`] → [`explorer`] →
//! [`scoring`] → [`ranker`]. No index exists: every candidate is generated on
//! demand from a coordinate the mapper derived from the query text.

pub mod analyzer;
pub mod explorer;
pub mod mapper;
pub mod ranker;
pub mod scoring;
pub mod types;

pub use types::{
    CancelToken, Candidate, QueryAnalysis, QueryType, ScoredBook, SearchCoordinate,
    SearchMetadata, SearchMode, SearchOptions, SearchResponse, SearchSource,
};
