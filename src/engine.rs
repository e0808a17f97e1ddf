//! Engine facade: top-level API for the infinite library.
//!
//! The `Engine` owns the vocabulary, the content generator and the worker
//! pool that fans out candidate generation and scoring. It exposes book
//! generation and search; it holds no per-request state, so one engine can
//! serve concurrent searches.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use rand::Rng;
use rayon::prelude::*;

use crate::config::LibraryConfig;
use crate::coordinate::Coordinate;
use crate::error::{BabelResult, SearchError};
use crate::library::generator::{random_coordinate, ContentGenerator};
use crate::library::model::Book;
use crate::search::scoring::{self, TermWeights};
use crate::search::types::{
    CancelToken, QueryAnalysis, ScoredBook, SearchMetadata, SearchOptions, SearchResponse,
};
use crate::search::{analyzer, explorer, mapper, ranker};
use crate::vocabulary::Vocabulary;

/// Configuration for the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// External vocabulary file. `None` uses the bundled vocabulary.
    pub vocabulary_path: Option<PathBuf>,
    /// Worker threads for generation and scoring; 0 uses one per CPU.
    pub worker_threads: usize,
    /// Fixed year for recency scoring; the system clock when `None`.
    pub current_year: Option<i32>,
}

impl From<&LibraryConfig> for EngineConfig {
    fn from(config: &LibraryConfig) -> Self {
        Self {
            vocabulary_path: config.vocabulary_path.clone(),
            worker_threads: config.worker_threads,
            current_year: config.current_year,
        }
    }
}

/// The infinite library engine.
pub struct Engine {
    config: EngineConfig,
    generator: ContentGenerator,
    pool: rayon::ThreadPool,
}

impl Engine {
    /// Create an engine, loading the configured vocabulary.
    pub fn new(config: EngineConfig) -> BabelResult<Self> {
        let vocab = match config.vocabulary_path {
            Some(ref path) => Arc::new(Vocabulary::load(path)?),
            None => Vocabulary::bundled()?,
        };
        Self::with_vocabulary(config, vocab)
    }

    /// Create an engine over an already-loaded vocabulary.
    pub fn with_vocabulary(config: EngineConfig, vocab: Arc<Vocabulary>) -> BabelResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("babel-worker-{i}"))
            .build()
            .map_err(|e| SearchError::WorkerPool {
                message: e.to_string(),
            })?;

        tracing::info!(
            vocabulary = %vocab.version,
            concepts = vocab.concepts.len(),
            fields = vocab.fields.len(),
            workers = pool.current_num_threads(),
            "initializing library engine"
        );

        Ok(Self {
            config,
            generator: ContentGenerator::new(vocab),
            pool,
        })
    }

    /// Generate the book at a coordinate.
    pub fn generate_book(&self, coordinate: &Coordinate) -> BabelResult<Book> {
        Ok(self.generator.generate(coordinate)?)
    }

    /// Generate the book at a random coordinate.
    pub fn random_book<R: Rng + ?Sized>(&self, rng: &mut R) -> BabelResult<Book> {
        self.generate_book(&random_coordinate(rng))
    }

    /// Synthesize the body of one chapter (1-based ordinal).
    pub fn chapter_text(&self, coordinate: &Coordinate, ordinal: usize) -> BabelResult<String> {
        Ok(self.generator.chapter_text(coordinate, ordinal)?)
    }

    /// Classify a query without searching.
    pub fn analyze(&self, query: &str) -> BabelResult<QueryAnalysis> {
        Ok(analyzer::analyze(query, self.vocabulary())?)
    }

    /// Search the library.
    pub fn search(&self, query: &str, options: &SearchOptions) -> BabelResult<SearchResponse> {
        self.search_with_cancel(query, options, &CancelToken::new())
    }

    /// Search the library, aborting once `cancel` is set.
    pub fn search_with_cancel(
        &self,
        query: &str,
        options: &SearchOptions,
        cancel: &CancelToken,
    ) -> BabelResult<SearchResponse> {
        options.validate()?;
        let analysis = analyzer::analyze(query, self.vocabulary())?;
        let coordinates = mapper::map(&analysis, options.mode);
        let terms = TermWeights::from_analysis(&analysis);
        let current_year = self.current_year();

        let scored: Vec<ScoredBook> = self.pool.install(|| {
            explorer::explore(&self.generator, &coordinates, cancel).map(|candidates| {
                candidates
                    .into_par_iter()
                    .map(|c| scoring::score(c, &terms, current_year))
                    .collect::<Vec<_>>()
            })
        })?;

        let total_explored = scored.len();
        let results = ranker::rank(scored, options.max_results, options.diversity_weight);

        tracing::info!(
            query_type = %analysis.query_type,
            mode = %options.mode,
            coordinates = coordinates.len(),
            explored = total_explored,
            results = results.len(),
            "search complete"
        );

        Ok(SearchResponse {
            results,
            metadata: SearchMetadata {
                total_explored,
                search_space_size: coordinates.len(),
                query_analysis: analysis,
                mode: options.mode,
            },
        })
    }

    /// Year used for recency scoring.
    pub fn current_year(&self) -> i32 {
        self.config
            .current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.generator.vocabulary()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Summary of the engine's tables and pool.
    pub fn info(&self) -> EngineInfo {
        let vocab = self.vocabulary();
        EngineInfo {
            vocabulary_version: vocab.version.clone(),
            concepts: vocab.concepts.len(),
            fields: vocab.fields.len(),
            adjectives: vocab.adjectives.len(),
            workers: self.pool.current_num_threads(),
            current_year: self.current_year(),
        }
    }
}

/// Summary information about the engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub vocabulary_version: String,
    pub concepts: usize,
    pub fields: usize,
    pub adjectives: usize,
    pub workers: usize,
    pub current_year: i32,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "babel-stacks engine info")?;
        writeln!(f, "  vocabulary:   {}", self.vocabulary_version)?;
        writeln!(f, "  concepts:     {}", self.concepts)?;
        writeln!(f, "  fields:       {}", self.fields)?;
        writeln!(f, "  adjectives:   {}", self.adjectives)?;
        writeln!(f, "  workers:      {}", self.workers)?;
        writeln!(f, "  current year: {}", self.current_year)?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("vocabulary", &self.vocabulary().version)
            .field("workers", &self.pool.current_num_threads())
            .finish()
    }
}
