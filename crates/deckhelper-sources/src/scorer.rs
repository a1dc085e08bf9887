use crate::traits::SynergySource;
use deckhelper_core::{
    score_collection, synergy_page_key, Collection, ScoreWeights, ScoredCommanders, ScoringConfig,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Scores candidates against a collection using per-commander synergy data.
pub struct SynergyScorer {
    source: Arc<dyn SynergySource>,
    weights: ScoreWeights,
    max_concurrent: usize,
    request_delay: Duration,
}

impl SynergyScorer {
    pub fn new(source: Arc<dyn SynergySource>, config: &ScoringConfig) -> Self {
        Self {
            source,
            weights: config.weights(),
            max_concurrent: config.max_concurrent.max(1),
            request_delay: config.request_delay(),
        }
    }

    /// Score for one candidate. Missing or unreachable data scores 0.
    pub async fn score_one(&self, candidate_name: &str, collection: &Collection) -> u32 {
        let page_key = synergy_page_key(candidate_name);
        let score = match self.source.synergy(&page_key).await {
            Ok(Some(records)) => {
                score_collection(candidate_name, collection, &records, &self.weights)
            }
            Ok(None) => {
                debug!("No synergy data for {} ({})", candidate_name, page_key);
                0
            }
            Err(e) => {
                debug!("Synergy fetch for {} failed: {}", candidate_name, e);
                0
            }
        };
        tokio::time::sleep(self.request_delay).await;
        score
    }

    /// Fills in every candidate's score. Previous scores are discarded.
    pub async fn score_all(&self, candidates: &mut ScoredCommanders, collection: &Collection) {
        let started = Instant::now();
        let names: Vec<String> = candidates.keys().cloned().collect();

        let scores: Vec<(String, u32)> = stream::iter(names)
            .map(|name| async move {
                let score = self.score_one(&name, collection).await;
                (name, score)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        for (name, score) in scores {
            if let Some(candidate) = candidates.get_mut(&name) {
                candidate.score = score;
            }
        }

        info!(
            "Scored {} candidates via {} in {:?}",
            candidates.len(),
            self.source.provider_name(),
            started.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::StaticSynergySource;
    use deckhelper_core::{CandidateCommander, Card, Color, SynergyRecord};

    fn config(max_concurrent: usize) -> ScoringConfig {
        ScoringConfig {
            max_concurrent,
            request_delay_ms: 0,
            ..ScoringConfig::default()
        }
    }

    fn sol_ring() -> SynergyRecord {
        SynergyRecord {
            name: "Sol Ring".to_string(),
            synergy: 0.5,
            num_decks: 800,
            potential_decks: 1000,
        }
    }

    fn candidates(names: &[&str]) -> ScoredCommanders {
        names
            .iter()
            .map(|n| {
                let card = Card::new(*n, [Color::Blue]).commander_legal();
                let mut c = CandidateCommander::solo(card);
                c.score = 99;
                (n.to_string(), c)
            })
            .collect()
    }

    #[tokio::test]
    async fn scores_known_commander() {
        let source = StaticSynergySource::new()
            .with_page("urza-lord-high-artificer", vec![sol_ring()]);
        let scorer = SynergyScorer::new(Arc::new(source), &config(4));
        let collection: Collection = [Card::colorless("Sol Ring")].into_iter().collect();

        assert_eq!(scorer.score_one("Urza, Lord High Artificer", &collection).await, 10);
    }

    #[tokio::test]
    async fn missing_and_broken_pages_score_zero() {
        let source = StaticSynergySource::new()
            .with_page("urza-lord-high-artificer", vec![sol_ring()])
            .with_broken_page("jhoira-weatherlight-captain");
        let scorer = SynergyScorer::new(Arc::new(source), &config(4));
        let collection: Collection = [Card::colorless("Sol Ring")].into_iter().collect();

        let mut all = candidates(&[
            "Urza, Lord High Artificer",
            "Jhoira, Weatherlight Captain",
            "Tinybones, Trinket Thief",
        ]);
        scorer.score_all(&mut all, &collection).await;

        assert_eq!(all["Urza, Lord High Artificer"].score, 10);
        assert_eq!(all["Jhoira, Weatherlight Captain"].score, 0);
        assert_eq!(all["Tinybones, Trinket Thief"].score, 0);
    }

    #[tokio::test]
    async fn pair_pages_use_joined_key() {
        let source = Arc::new(StaticSynergySource::new());
        let scorer = SynergyScorer::new(source.clone(), &config(1));
        let collection: Collection = [Card::colorless("Sol Ring")].into_iter().collect();

        scorer
            .score_one("Thrasios, Triton Hero + Tymna the Weaver", &collection)
            .await;
        assert_eq!(source.requested(), vec!["thrasios-triton-hero-tymna-the-weaver"]);
    }

    #[tokio::test]
    async fn fetches_respect_concurrency_limit() {
        let source = Arc::new(StaticSynergySource::new().with_latency(Duration::from_millis(20)));
        let scorer = SynergyScorer::new(source.clone(), &config(2));
        let collection: Collection = [Card::colorless("Sol Ring")].into_iter().collect();

        let mut all = candidates(&["A", "B", "C", "D", "E", "F"]);
        scorer.score_all(&mut all, &collection).await;

        assert_eq!(source.requested().len(), 6);
        assert!(source.max_in_flight() <= 2);
        assert!(all.values().all(|c| c.score == 0));
    }
}
