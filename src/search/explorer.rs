//! Library exploration: materialize candidate books for mapped coordinates.
//!
//! Exploration first fixes a plan (every mapped coordinate, then volume
//! neighbours until the candidate cap is reached) and then generates the plan
//! in parallel on the current rayon pool. A coordinate that fails to generate
//! is logged and dropped; only cancellation aborts the whole exploration.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::coordinate::Coordinate;
use crate::error::{SearchError, SearchResult};
use crate::library::generator::ContentGenerator;
use crate::search::types::{CancelToken, Candidate, SearchCoordinate, SearchSource};

/// Maximum candidate books per search, adjacency expansion included.
pub const MAX_CANDIDATES: usize = 200;

/// Volume offsets tried around each mapped coordinate.
pub const ADJACENT_OFFSETS: [i32; 4] = [-2, -1, 1, 2];

/// Relevance multiplier for adjacent candidates.
pub const ADJACENT_DECAY: f32 = 0.8;

/// Decide which coordinates to generate, in order.
///
/// Mapped coordinates always come first. Volume neighbours follow, coordinate
/// by coordinate, while the plan is below [`MAX_CANDIDATES`]; a neighbour
/// already in the plan is skipped.
pub fn plan(coordinates: &[SearchCoordinate]) -> Vec<SearchCoordinate> {
    let mut planned: Vec<SearchCoordinate> = Vec::with_capacity(MAX_CANDIDATES);
    let mut seen: HashSet<Coordinate> = HashSet::with_capacity(MAX_CANDIDATES);

    for sc in coordinates.iter().take(MAX_CANDIDATES) {
        if seen.insert(sc.coordinate) {
            planned.push(*sc);
        }
    }

    'expand: for sc in coordinates {
        for offset in ADJACENT_OFFSETS {
            if planned.len() >= MAX_CANDIDATES {
                break 'expand;
            }
            let neighbour = sc.coordinate.with_volume_offset(offset);
            if seen.insert(neighbour) {
                planned.push(SearchCoordinate {
                    coordinate: neighbour,
                    source: SearchSource::Adjacent,
                    base_relevance: sc.base_relevance * ADJACENT_DECAY,
                });
            }
        }
    }

    planned
}

/// Generate candidate books for `coordinates` on the current rayon pool.
///
/// The cancellation token is checked before every generation; once it is
/// set, the exploration fails with [`SearchError::Cancelled`].
pub fn explore(
    generator: &ContentGenerator,
    coordinates: &[SearchCoordinate],
    cancel: &CancelToken,
) -> SearchResult<Vec<Candidate>> {
    let plan = plan(coordinates);
    let generated = AtomicUsize::new(0);

    let outcomes: Result<Vec<Option<Candidate>>, ()> = plan
        .par_iter()
        .map(|sc| {
            if cancel.is_cancelled() {
                return Err(());
            }
            match generator.generate(&sc.coordinate) {
                Ok(book) => {
                    generated.fetch_add(1, Ordering::Relaxed);
                    Ok(Some(Candidate {
                        book,
                        coordinate_relevance: sc.base_relevance,
                        search_source: sc.source,
                    }))
                }
                Err(e) => {
                    tracing::warn!(
                        coordinate = %sc.coordinate,
                        source = %sc.source,
                        "skipping candidate: {e}"
                    );
                    Ok(None)
                }
            }
        })
        .collect();

    let candidates: Vec<Candidate> = outcomes
        .map_err(|()| SearchError::Cancelled {
            explored: generated.load(Ordering::Relaxed),
        })?
        .into_iter()
        .flatten()
        .collect();

    tracing::debug!(
        planned = plan.len(),
        generated = candidates.len(),
        "explored library"
    );
    Ok(candidates)
}
