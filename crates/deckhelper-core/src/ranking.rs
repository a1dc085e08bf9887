use crate::{CandidateCommander, PairKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 10;

/// One row of the presented top list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCommander {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub kind: PairKind,
    pub images: Vec<String>,
}

fn by_score_then_name(a: &CandidateCommander, b: &CandidateCommander) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
}

/// Highest scores first, ties by name, at most `limit` entries. No padding.
pub fn top_candidates<I>(candidates: I, limit: usize) -> Vec<CandidateCommander>
where
    I: IntoIterator<Item = CandidateCommander>,
{
    let mut sorted: Vec<_> = candidates.into_iter().collect();
    sorted.sort_by(by_score_then_name);
    sorted.truncate(limit);
    sorted
}

pub fn present(ranked: &[CandidateCommander]) -> Vec<RankedCommander> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, candidate)| RankedCommander {
            rank: idx + 1,
            name: candidate.name.clone(),
            score: candidate.score,
            kind: candidate.kind,
            images: candidate.image_urls(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, Color};

    fn scored(name: &str, score: u32) -> CandidateCommander {
        let mut c = CandidateCommander::solo(
            Card::new(name, [Color::Red]).with_image(format!("https://img/{name}.png")),
        );
        c.score = score;
        c
    }

    #[test]
    fn fewer_than_limit_returns_all_sorted() {
        let ranked = top_candidates(vec![scored("B", 3), scored("A", 7), scored("C", 5)], 10);
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn truncates_to_limit() {
        let candidates = (0..25).map(|i| scored(&format!("Commander {i:02}"), i));
        let ranked = top_candidates(candidates, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].score, 24);
        assert_eq!(ranked[9].score, 15);
    }

    #[test]
    fn ties_break_by_name() {
        let ranked = top_candidates(vec![scored("Zur", 5), scored("Atraxa", 5), scored("Kenrith", 5)], 2);
        assert_eq!(ranked[0].name, "Atraxa");
        assert_eq!(ranked[1].name, "Kenrith");
    }

    #[test]
    fn present_numbers_rows_and_collects_images() {
        let rows = present(&top_candidates(vec![scored("A", 4), scored("B", 9)], 10));
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "B");
        assert_eq!(rows[0].images, vec!["https://img/B.png".to_string()]);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(top_candidates(Vec::new(), 10).is_empty());
    }
}
