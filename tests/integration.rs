//! End-to-end integration tests for the babel-stacks engine.
//!
//! These tests drive the public API the way the CLI does: generating books
//! at coordinates, running searches through the full analyze → map → explore
//! → score → rank pipeline, and loading vocabularies and configs from disk.

use std::collections::HashSet;

use rand::SeedableRng;

use babel_stacks::config::LibraryConfig;
use babel_stacks::coordinate::Coordinate;
use babel_stacks::engine::{Engine, EngineConfig};
use babel_stacks::error::{BabelError, SearchError};
use babel_stacks::library::LibraryError;
use babel_stacks::search::explorer::MAX_CANDIDATES;
use babel_stacks::search::mapper::MAX_SEARCH_COORDINATES;
use babel_stacks::search::{QueryType, SearchMode, SearchOptions, SearchSource};

fn test_engine() -> Engine {
    Engine::new(EngineConfig {
        worker_threads: 2,
        current_year: Some(2024),
        ..Default::default()
    })
    .unwrap()
}

fn options(max_results: usize) -> SearchOptions {
    SearchOptions {
        max_results,
        ..Default::default()
    }
}

const CUSTOM_VOCABULARY: &str = r#"
[meta]
version = "test-0.1"
latest_year = 1999

[terms]
concepts = ["lighthouses", "tides"]
fields = ["navigation"]
adjectives = ["salt-worn"]

[names]
first = ["Ada"]
last = ["Lovelace"]

[content]
genres = ["Cartography"]
publishers = ["Harbour Press"]
title_templates = ["On {Concept}"]
abstract_templates = ["A study of {concept} in {field}."]
chapter_templates = ["The {Adjective} {Concept}"]
prose_templates = ["The {concept} turned toward {field} once more."]
"#;

#[test]
fn conceptual_query_returns_five_results() {
    let engine = test_engine();
    let response = engine
        .search("artificial intelligence consciousness philosophy", &options(5))
        .unwrap();

    let analysis = &response.metadata.query_analysis;
    assert_eq!(
        analysis.concepts,
        vec!["artificial", "intelligence", "consciousness"]
    );
    assert_eq!(analysis.fields, vec!["philosophy"]);
    assert_eq!(analysis.query_type, QueryType::Conceptual);
    assert_eq!(response.results.len(), 5);

    for pair in response.results.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
}

#[test]
fn book_at_coordinate_is_stable() {
    let engine = test_engine();
    let coordinate: Coordinate = "12345.3.2.15".parse().unwrap();

    let first = engine.generate_book(&coordinate).unwrap();
    let second = engine.generate_book(&coordinate).unwrap();

    assert_eq!(first.id, "12345.3.2.15");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    // A fresh engine over the same vocabulary produces the same book.
    let other = test_engine().generate_book(&coordinate).unwrap();
    assert_eq!(first, other);
}

#[test]
fn empty_queries_are_rejected() {
    let engine = test_engine();
    for query in ["", "   ", "\t\n"] {
        let err = engine.search(query, &SearchOptions::default()).unwrap_err();
        assert!(
            matches!(err, BabelError::Search(SearchError::InvalidQuery { .. })),
            "query {query:?} gave {err:?}"
        );
    }
}

#[test]
fn out_of_range_wall_is_rejected() {
    let engine = test_engine();
    let err = engine
        .generate_book(&Coordinate {
            hexagon: 7,
            wall: 6,
            shelf: 0,
            volume: 0,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        BabelError::Library(LibraryError::InvalidCoordinate { .. })
    ));

    assert!("7.6.0.0".parse::<Coordinate>().is_err());
}

#[test]
fn result_count_is_capped() {
    let engine = test_engine();
    let query = "hidden memory of rivers";
    let explored = engine
        .search(query, &options(0))
        .unwrap()
        .metadata
        .total_explored;
    assert!(explored > 0);

    for k in [0, 1, 3, 10, explored, explored + 5] {
        let response = engine.search(query, &options(k)).unwrap();
        assert_eq!(response.results.len(), k.min(explored), "k = {k}");
    }
}

#[test]
fn scores_stay_in_range() {
    let engine = test_engine();
    let response = engine
        .search(
            "ancient entropy in physics",
            &SearchOptions {
                max_results: 50,
                diversity_weight: 0.0,
                ..Default::default()
            },
        )
        .unwrap();

    for hit in &response.results {
        assert!((0.0..=1.0).contains(&hit.relevance_score));
        assert!((0.0..=1.0).contains(&hit.quality_score));
        assert!((0.0..=1.0).contains(&hit.novelty_score));
        // Without a diversity bonus the final score is a convex mix.
        assert!((0.0..=1.0 + 1e-6).contains(&hit.final_score));
    }
}

#[test]
fn search_space_is_bounded() {
    let engine = test_engine();
    let long_query = engine
        .vocabulary()
        .concepts
        .iter()
        .chain(engine.vocabulary().fields.iter())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    let response = engine.search(&long_query, &options(10)).unwrap();
    let meta = &response.metadata;
    assert_eq!(meta.search_space_size, MAX_SEARCH_COORDINATES);
    assert!(meta.total_explored <= MAX_CANDIDATES);
    assert_eq!(response.results.len(), 10);
}

#[test]
fn deterministic_mode_is_reproducible() {
    let engine = test_engine();
    let opts = SearchOptions {
        max_results: 15,
        mode: SearchMode::Deterministic,
        ..Default::default()
    };

    let ids = |engine: &Engine| -> Vec<String> {
        engine
            .search("forgotten libraries of time", &opts)
            .unwrap()
            .results
            .into_iter()
            .map(|hit| hit.book.id)
            .collect()
    };

    let first = ids(&engine);
    assert_eq!(first, ids(&engine));
    assert_eq!(first, ids(&test_engine()));
}

#[test]
fn serendipitous_mode_keeps_mapped_coordinates() {
    let engine = test_engine();
    let opts = SearchOptions {
        max_results: 200,
        mode: SearchMode::Serendipitous,
        ..Default::default()
    };
    let response = engine.search("memory", &opts).unwrap();
    assert_eq!(response.metadata.mode, SearchMode::Serendipitous);

    let sources: HashSet<SearchSource> =
        response.results.iter().map(|hit| hit.search_source).collect();
    assert!(sources.contains(&SearchSource::Concept));
    assert!(sources.contains(&SearchSource::Exploration));
}

#[test]
fn results_are_unique_books() {
    let engine = test_engine();
    let response = engine.search("time and memory", &options(100)).unwrap();
    let ids: HashSet<_> = response.results.iter().map(|hit| &hit.book.id).collect();
    assert_eq!(ids.len(), response.results.len());
}

#[test]
fn custom_vocabulary_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("vocabulary.toml");
    std::fs::write(&path, CUSTOM_VOCABULARY).unwrap();

    let engine = Engine::new(EngineConfig {
        vocabulary_path: Some(path),
        worker_threads: 1,
        current_year: Some(2024),
    })
    .unwrap();
    assert_eq!(engine.info().vocabulary_version, "test-0.1");

    let book = engine
        .generate_book(&Coordinate::new(42, 1, 2, 3).unwrap())
        .unwrap();
    assert!(book.author.starts_with("Ada "));
    assert!(book.author.ends_with("Lovelace"));
    assert_eq!(book.genre, "Cartography");
    assert!(book.title.starts_with("On "));
    assert!(book.publication_year <= 1999);
    assert!(book.bibliography.iter().all(|b| b.publisher == "Harbour Press"));

    let response = engine
        .search("salt-worn lighthouses and navigation", &options(3))
        .unwrap();
    let analysis = &response.metadata.query_analysis;
    assert_eq!(analysis.concepts, vec!["lighthouses"]);
    assert_eq!(analysis.fields, vec!["navigation"]);
    assert_eq!(analysis.adjectives, vec!["salt-worn"]);
    assert_eq!(analysis.query_type, QueryType::Academic);
    assert_eq!(response.results.len(), 3);
}

#[test]
fn broken_vocabulary_file_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("vocabulary.toml");
    std::fs::write(&path, "[meta]\nversion = \"x\"\n").unwrap();

    let err = Engine::new(EngineConfig {
        vocabulary_path: Some(path),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, BabelError::Vocabulary(_)));
}

#[test]
fn chapter_text_matches_chapter_length() {
    let engine = test_engine();
    let coordinate = Coordinate::new(12345, 3, 2, 15).unwrap();
    let book = engine.generate_book(&coordinate).unwrap();
    let chapter = &book.chapters[0];

    let text = engine.chapter_text(&coordinate, 1).unwrap();
    assert!(text.split_whitespace().count() >= chapter.word_count as usize);
    assert_eq!(text, engine.chapter_text(&coordinate, 1).unwrap());

    let err = engine
        .chapter_text(&coordinate, book.chapters.len() + 1)
        .unwrap_err();
    assert!(matches!(
        err,
        BabelError::Library(LibraryError::ChapterOutOfRange { .. })
    ));
}

#[test]
fn seeded_random_books_repeat() {
    let engine = test_engine();
    let a = engine
        .random_book(&mut rand::rngs::StdRng::seed_from_u64(9))
        .unwrap();
    let b = engine
        .random_book(&mut rand::rngs::StdRng::seed_from_u64(9))
        .unwrap();
    assert_eq!(a, b);
    assert!(a.coordinate.validate().is_ok());
}

#[test]
fn config_file_drives_search_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "max_results = 4\nmode = \"deterministic\"\nworker_threads = 1\ncurrent_year = 2024\n",
    )
    .unwrap();

    let config = LibraryConfig::resolve(Some(&path)).unwrap();
    let engine = Engine::new(EngineConfig::from(&config)).unwrap();
    assert_eq!(engine.current_year(), 2024);

    let response = engine
        .search("the geometry of dreams", &config.search_options())
        .unwrap();
    assert_eq!(response.results.len(), 4);
}

#[test]
fn overridden_diversity_weight_is_validated() {
    let config = LibraryConfig::default();
    let engine = Engine::new(EngineConfig::from(&config)).unwrap();

    for weight in [-0.5, f32::NAN] {
        let mut opts = config.search_options();
        opts.diversity_weight = weight;
        let err = engine.search("memory", &opts).unwrap_err();
        assert!(matches!(
            err,
            BabelError::Search(SearchError::InvalidOptions { .. })
        ));
    }
}
