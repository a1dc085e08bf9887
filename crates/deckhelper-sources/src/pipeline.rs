// ABOUTME: End-to-end recommendation: color union, candidate generation, scoring, ranking
// ABOUTME: One handle over the card database and synergy source, shared by the server and CLI
use crate::candidates::CandidateGenerator;
use crate::edhrec::EdhrecClient;
use crate::scorer::SynergyScorer;
use crate::scryfall::ScryfallClient;
use crate::traits::{CardDatabase, SynergySource};
use deckhelper_core::{
    present, top_candidates, Card, Collection, DeckHelperError, RankedCommander, Result,
    ScoredCommanders, Settings,
};
use std::sync::Arc;
use tracing::info;

pub struct Recommender {
    db: Arc<dyn CardDatabase>,
    generator: CandidateGenerator,
    scorer: SynergyScorer,
    top_n: usize,
}

impl Recommender {
    pub fn new(
        db: Arc<dyn CardDatabase>,
        synergy: Arc<dyn SynergySource>,
        settings: &Settings,
    ) -> Self {
        Self {
            generator: CandidateGenerator::new(db.clone()),
            scorer: SynergyScorer::new(synergy, &settings.scoring),
            top_n: settings.ranking.top_n,
            db,
        }
    }

    /// Recommender backed by the public Scryfall and EDHREC APIs.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let db = Arc::new(ScryfallClient::new(&settings.scryfall)?);
        let synergy = Arc::new(EdhrecClient::new(&settings.edhrec)?);
        Ok(Self::new(db, synergy, settings))
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub async fn lookup(&self, name: &str) -> Result<Card> {
        self.db.named_fuzzy(name).await
    }

    /// Every candidate for the collection, scored.
    pub async fn recommend(&self, collection: &Collection) -> Result<ScoredCommanders> {
        if collection.is_empty() {
            return Err(DeckHelperError::InvalidInput(
                "collection must contain at least one card".to_string(),
            ));
        }

        let colors = collection.color_identity();
        info!(
            "Recommending commanders for {} cards, colors {}",
            collection.len(),
            colors
        );

        let mut candidates = self.generator.generate(&colors).await?;
        self.scorer.score_all(&mut candidates, collection).await;
        Ok(candidates)
    }

    /// Top `ranking.top_n` candidates, best first.
    pub async fn recommend_ranked(&self, collection: &Collection) -> Result<Vec<RankedCommander>> {
        let scored = self.recommend(collection).await?;
        let top = top_candidates(scored.into_values(), self.top_n);
        Ok(present(&top))
    }
}
