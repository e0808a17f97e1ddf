//! Coordinate mapping: turn a query analysis into a bounded set of coordinates.
//!
//! Each concept and field term projects to a handful of coordinates derived
//! from its hash, and the whole query contributes a fixed number of
//! exploration coordinates. The result is deduplicated and capped, so a search
//! never touches more than [`MAX_SEARCH_COORDINATES`] slots before adjacency
//! expansion.

use std::collections::HashSet;

use rand::Rng;

use crate::coordinate::Coordinate;
use crate::hash::hash;
use crate::search::types::{QueryAnalysis, SearchCoordinate, SearchMode, SearchSource};

/// Maximum mapped coordinates per search.
pub const MAX_SEARCH_COORDINATES: usize = 100;

/// Hexagon range that mapped coordinates are folded into.
pub const HEXAGON_SPAN: u64 = 1_000_000;

pub const CONCEPT_VARIANTS: u64 = 5;
pub const FIELD_VARIANTS: u64 = 3;
pub const EXPLORATION_COORDINATES: u64 = 20;

/// Per-axis strides for one family of derived coordinates.
struct Strides {
    hexagon: u64,
    wall: u64,
    shelf: u64,
    volume: u64,
}

const CONCEPT_STRIDES: Strides = Strides {
    hexagon: 1000,
    wall: 100,
    shelf: 10,
    volume: 1,
};

const FIELD_STRIDES: Strides = Strides {
    hexagon: 2000,
    wall: 200,
    shelf: 20,
    volume: 2,
};

const EXPLORATION_STRIDES: Strides = Strides {
    hexagon: 12345,
    wall: 67,
    shelf: 13,
    volume: 7,
};

fn derive(h: u32, i: u64, strides: &Strides) -> Coordinate {
    let h = u64::from(h);
    Coordinate::wrapping(
        (h + i * strides.hexagon) % HEXAGON_SPAN,
        h + i * strides.wall,
        h + i * strides.shelf,
        h + i * strides.volume,
    )
}

/// Prior relevance of the `i`-th exploration coordinate, in `[0.3, 0.7)`.
fn exploration_relevance(query: &str, i: u64, mode: SearchMode) -> f32 {
    match mode {
        SearchMode::Deterministic => {
            0.3 + (hash(&format!("{query}#{i}")) % 400) as f32 / 1000.0
        }
        SearchMode::Serendipitous => rand::thread_rng().gen_range(0.3..0.7),
    }
}

/// Map an analysis to its search coordinates, in generation order.
pub fn map(analysis: &QueryAnalysis, mode: SearchMode) -> Vec<SearchCoordinate> {
    let mut out = Vec::new();

    for concept in &analysis.concepts {
        let h = hash(concept);
        out.extend((0..CONCEPT_VARIANTS).map(|i| SearchCoordinate {
            coordinate: derive(h, i, &CONCEPT_STRIDES),
            source: SearchSource::Concept,
            base_relevance: 1.0 - 0.1 * i as f32,
        }));
    }

    for field in &analysis.fields {
        let h = hash(&format!("{field}-field"));
        out.extend((0..FIELD_VARIANTS).map(|i| SearchCoordinate {
            coordinate: derive(h, i, &FIELD_STRIDES),
            source: SearchSource::Field,
            base_relevance: 0.8 - 0.1 * i as f32,
        }));
    }

    let h = hash(&analysis.original_query);
    out.extend((0..EXPLORATION_COORDINATES).map(|i| SearchCoordinate {
        coordinate: derive(h, i, &EXPLORATION_STRIDES),
        source: SearchSource::Exploration,
        base_relevance: exploration_relevance(&analysis.original_query, i, mode),
    }));

    let mut seen = HashSet::with_capacity(out.len());
    out.retain(|sc| seen.insert(sc.coordinate));
    out.truncate(MAX_SEARCH_COORDINATES);

    tracing::debug!(
        concepts = analysis.concepts.len(),
        fields = analysis.fields.len(),
        coordinates = out.len(),
        "mapped query to coordinates"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::QueryType;

    fn analysis(query: &str, concepts: &[&str], fields: &[&str]) -> QueryAnalysis {
        QueryAnalysis {
            original_query: query.into(),
            concepts: concepts.iter().map(|s| s.to_string()).collect(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
            adjectives: vec![],
            unknown_terms: vec![],
            query_type: QueryType::General,
            complexity: 0.0,
        }
    }

    #[test]
    fn concept_variants_follow_formula() {
        let a = analysis("time", &["time"], &[]);
        let coords = map(&a, SearchMode::Deterministic);
        let h = u64::from(hash("time"));
        for i in 0..5u64 {
            let sc = coords[i as usize];
            assert_eq!(sc.source, SearchSource::Concept);
            assert_eq!(sc.coordinate.hexagon, (h + i * 1000) % 1_000_000);
            assert_eq!(u64::from(sc.coordinate.wall), (h + i * 100) % 6);
            assert_eq!(u64::from(sc.coordinate.shelf), (h + i * 10) % 5);
            assert_eq!(u64::from(sc.coordinate.volume), (h + i) % 32);
            assert!((sc.base_relevance - (1.0 - 0.1 * i as f32)).abs() < 1e-6);
        }
    }

    #[test]
    fn field_variants_use_suffixed_hash() {
        let a = analysis("physics", &[], &["physics"]);
        let coords = map(&a, SearchMode::Deterministic);
        let h = u64::from(hash("physics-field"));
        assert_eq!(coords[0].source, SearchSource::Field);
        assert_eq!(coords[0].coordinate.hexagon, h % 1_000_000);
        assert_eq!(coords[2].coordinate.hexagon, (h + 4000) % 1_000_000);
        assert_eq!(u64::from(coords[2].coordinate.volume), (h + 4) % 32);
        assert!((coords[1].base_relevance - 0.7).abs() < 1e-6);
    }

    #[test]
    fn exploration_always_present_with_bounded_relevance() {
        let a = analysis("nothing recognized here", &[], &[]);
        for mode in [SearchMode::Deterministic, SearchMode::Serendipitous] {
            let coords = map(&a, mode);
            assert!(!coords.is_empty() && coords.len() <= 20);
            for sc in &coords {
                assert_eq!(sc.source, SearchSource::Exploration);
                assert!((0.3..0.7).contains(&sc.base_relevance));
            }
        }
    }

    #[test]
    fn deterministic_mode_is_reproducible() {
        let a = analysis("memory time entropy", &["memory", "time", "entropy"], &[]);
        assert_eq!(
            map(&a, SearchMode::Deterministic),
            map(&a, SearchMode::Deterministic)
        );
    }

    #[test]
    fn serendipitous_mode_keeps_coordinate_set() {
        let a = analysis("memory time", &["memory", "time"], &[]);
        let left: Vec<Coordinate> = map(&a, SearchMode::Serendipitous)
            .iter()
            .map(|sc| sc.coordinate)
            .collect();
        let right: Vec<Coordinate> = map(&a, SearchMode::Deterministic)
            .iter()
            .map(|sc| sc.coordinate)
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn duplicates_removed_and_capped() {
        let concepts: Vec<String> = (0..40).map(|i| format!("term{i}")).collect();
        let refs: Vec<&str> = concepts.iter().map(String::as_str).collect();
        let mut a = analysis("many terms", &refs, &[]);
        // a repeated concept must not produce repeated coordinates
        a.concepts.push("term0".into());
        let coords = map(&a, SearchMode::Deterministic);
        assert_eq!(coords.len(), MAX_SEARCH_COORDINATES);
        let unique: HashSet<Coordinate> = coords.iter().map(|sc| sc.coordinate).collect();
        assert_eq!(unique.len(), coords.len());
        // generation order preserved: first concept's variants come first
        assert_eq!(coords[0].coordinate, derive(hash("term0"), 0, &CONCEPT_STRIDES));
    }
}
