//! Diversity-aware ranking.
//!
//! A single greedy pass over the score-sorted candidates: each selected book
//! earns a bonus if its author or genre has not been selected yet. The
//! seen-sets live only for the duration of one [`rank`] call.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::search::types::ScoredBook;

/// Bonus (times the diversity weight) for a not-yet-seen author.
pub const AUTHOR_BONUS: f32 = 0.2;
/// Bonus (times the diversity weight) for a not-yet-seen genre.
pub const GENRE_BONUS: f32 = 0.1;

/// Descending by final score, ties broken by ascending book id.
fn by_score_desc(a: &ScoredBook, b: &ScoredBook) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.book.id.cmp(&b.book.id))
}

/// Select at most `max_results` candidates, favouring unseen authors and genres.
///
/// Adjusted final scores can exceed 1.0.
pub fn rank(
    mut candidates: Vec<ScoredBook>,
    max_results: usize,
    diversity_weight: f32,
) -> Vec<ScoredBook> {
    candidates.sort_by(by_score_desc);

    let mut seen_authors: HashSet<String> = HashSet::new();
    let mut seen_genres: HashSet<String> = HashSet::new();
    let mut selected = Vec::with_capacity(max_results.min(candidates.len()));

    for mut candidate in candidates {
        if selected.len() >= max_results {
            break;
        }
        if seen_authors.insert(candidate.book.author.clone()) {
            candidate.final_score += AUTHOR_BONUS * diversity_weight;
        }
        if seen_genres.insert(candidate.book.genre.clone()) {
            candidate.final_score += GENRE_BONUS * diversity_weight;
        }
        selected.push(candidate);
    }

    selected.sort_by(by_score_desc);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::library::model::Book;
    use crate::search::types::SearchSource;

    fn scored(id: u64, author: &str, genre: &str, final_score: f32) -> ScoredBook {
        ScoredBook {
            book: Book {
                id: format!("{id}.0.0.0"),
                coordinate: Coordinate::new(id, 0, 0, 0).unwrap(),
                title: format!("Book {id}"),
                author: author.into(),
                abstract_text: String::new(),
                genre: genre.into(),
                publication_year: 2000,
                word_count: 0,
                chapters: vec![],
                bibliography: vec![],
            },
            coordinate_relevance: 0.0,
            search_source: SearchSource::Concept,
            relevance_score: 0.0,
            quality_score: 0.0,
            novelty_score: 0.0,
            final_score,
        }
    }

    fn ids(ranked: &[ScoredBook]) -> Vec<&str> {
        ranked.iter().map(|s| s.book.id.as_str()).collect()
    }

    #[test]
    fn caps_at_max_results() {
        let candidates: Vec<_> = (0..10)
            .map(|i| scored(i, "A", "G", i as f32 / 10.0))
            .collect();
        assert_eq!(rank(candidates.clone(), 3, 0.7).len(), 3);
        assert!(rank(candidates.clone(), 0, 0.7).is_empty());
        assert_eq!(rank(candidates, 50, 0.7).len(), 10);
    }

    #[test]
    fn first_of_each_author_and_genre_gets_bonus() {
        let candidates = vec![
            scored(1, "Ada", "Treatise", 0.9),
            scored(2, "Ada", "Treatise", 0.85),
            scored(3, "Omar", "Treatise", 0.8),
        ];
        let ranked = rank(candidates, 3, 1.0);
        // 1: 0.9 + 0.2 + 0.1; 3: 0.8 + 0.2; 2: 0.85 unchanged
        assert_eq!(ids(&ranked), vec!["1.0.0.0", "3.0.0.0", "2.0.0.0"]);
        assert!((ranked[0].final_score - 1.2).abs() < 1e-6);
        assert!((ranked[1].final_score - 1.0).abs() < 1e-6);
        assert!((ranked[2].final_score - 0.85).abs() < 1e-6);
    }

    #[test]
    fn zero_weight_keeps_score_order() {
        let candidates = vec![
            scored(1, "Ada", "Treatise", 0.5),
            scored(2, "Ada", "Treatise", 0.9),
            scored(3, "Omar", "Atlas", 0.7),
        ];
        let ranked = rank(candidates, 3, 0.0);
        assert_eq!(ids(&ranked), vec!["2.0.0.0", "3.0.0.0", "1.0.0.0"]);
    }

    #[test]
    fn ties_are_broken_by_id() {
        let candidates = vec![
            scored(9, "Ada", "Treatise", 0.5),
            scored(4, "Ada", "Treatise", 0.5),
        ];
        let ranked = rank(candidates, 1, 0.0);
        assert_eq!(ids(&ranked), vec!["4.0.0.0"]);
    }

    #[test]
    fn non_finite_scores_keep_a_total_order() {
        let candidates = vec![
            scored(1, "Ada", "Treatise", 0.2),
            scored(2, "Omar", "Atlas", f32::NAN),
            scored(3, "Lin", "Essay", 0.9),
            scored(4, "Ines", "Novel", 0.5),
        ];
        let ranked = rank(candidates, 4, 0.0);
        assert_eq!(ranked.len(), 4);
        let finite: Vec<&str> = ranked
            .iter()
            .filter(|s| s.final_score.is_finite())
            .map(|s| s.book.id.as_str())
            .collect();
        assert_eq!(finite, vec!["3.0.0.0", "4.0.0.0", "1.0.0.0"]);
    }
}
