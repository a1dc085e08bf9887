//! Commander candidate generation.
//!
//! One search per variant against the card database, then pairing in memory.
//! Every candidate that leaves this module is commander-legal and covers the
//! target color identity.

use crate::query::SearchQuery;
use crate::traits::CardDatabase;
use deckhelper_core::{
    CandidateCommander, Card, ColorIdentity, PairKind, Result, ScoredCommanders,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct CandidateGenerator {
    db: Arc<dyn CardDatabase>,
}

impl CandidateGenerator {
    pub fn new(db: Arc<dyn CardDatabase>) -> Self {
        Self { db }
    }

    /// All candidates for `colors`, keyed by candidate name.
    ///
    /// The first failing search aborts the whole run.
    pub async fn generate(&self, colors: &ColorIdentity) -> Result<ScoredCommanders> {
        info!(
            "Generating commander candidates for {} via {}",
            colors,
            self.db.provider_name()
        );

        if colors.is_empty() {
            let solo = self.solo(colors).await?;
            return Ok(merge([solo]));
        }

        let (solo, partners, partner_with, backgrounds, doctors, friends) = tokio::try_join!(
            self.solo(colors),
            self.partners(colors),
            self.partner_with(colors),
            self.backgrounds(colors),
            self.doctors(colors),
            self.friends_forever(colors),
        )?;

        let merged = merge([solo, partners, partner_with, backgrounds, doctors, friends]);
        info!("{} commander candidates for {}", merged.len(), colors);
        Ok(merged)
    }

    async fn solo(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let cards = self.db.search(&SearchQuery::solo(colors)).await?;
        let solo = solo_candidates(cards, colors);
        info!("{} solo commanders found", solo.len());
        Ok(solo)
    }

    async fn partners(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let cards = self.db.search(&SearchQuery::partners(colors)).await?;
        let pairs = pair_combinations(PairKind::Partner, &cards, colors);
        info!("{} partner pairs from {} partners", pairs.len(), cards.len());
        Ok(pairs)
    }

    async fn partner_with(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let cards = self.db.search(&SearchQuery::partner_with(colors)).await?;
        let pairs = partner_with_pairs(&cards, colors);
        info!("{} 'partner with' pairs from {} cards", pairs.len(), cards.len());
        Ok(pairs)
    }

    async fn backgrounds(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let creatures_query = SearchQuery::background_creatures(colors);
        let backgrounds_query = SearchQuery::backgrounds(colors);
        let (creatures, backgrounds) = tokio::try_join!(
            self.db.search(&creatures_query),
            self.db.search(&backgrounds_query),
        )?;
        let pairs = cross_pairs(PairKind::Background, &creatures, &backgrounds, colors);
        info!(
            "{} background pairs from {} creatures and {} backgrounds",
            pairs.len(),
            creatures.len(),
            backgrounds.len()
        );
        Ok(pairs)
    }

    async fn doctors(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let doctors_query = SearchQuery::doctors(colors);
        let companions_query = SearchQuery::doctor_companions(colors);
        let (doctors, companions) = tokio::try_join!(
            self.db.search(&doctors_query),
            self.db.search(&companions_query),
        )?;
        let pairs = cross_pairs(PairKind::DoctorCompanion, &doctors, &companions, colors);
        info!(
            "{} doctor pairs from {} doctors and {} companions",
            pairs.len(),
            doctors.len(),
            companions.len()
        );
        Ok(pairs)
    }

    async fn friends_forever(&self, colors: &ColorIdentity) -> Result<Vec<CandidateCommander>> {
        let cards = self.db.search(&SearchQuery::friends_forever(colors)).await?;
        let pairs = pair_combinations(PairKind::FriendsForever, &cards, colors);
        info!("{} friends forever pairs from {} cards", pairs.len(), cards.len());
        Ok(pairs)
    }
}

/// Earlier groups win on name collisions.
fn merge<const N: usize>(groups: [Vec<CandidateCommander>; N]) -> ScoredCommanders {
    let mut merged = ScoredCommanders::new();
    for candidate in groups.into_iter().flatten() {
        merged.entry(candidate.name.clone()).or_insert(candidate);
    }
    merged
}

fn covers(first: &Card, second: &Card, colors: &ColorIdentity) -> bool {
    second
        .color_identity
        .is_superset(&first.color_identity.deficit(colors))
}

pub fn solo_candidates(cards: Vec<Card>, colors: &ColorIdentity) -> Vec<CandidateCommander> {
    cards
        .into_iter()
        .filter(|card| card.is_commander_legal() && card.color_identity.is_superset(colors))
        .map(CandidateCommander::solo)
        .collect()
}

/// Unordered pairs drawn from one result set.
pub fn pair_combinations(
    kind: PairKind,
    cards: &[Card],
    colors: &ColorIdentity,
) -> Vec<CandidateCommander> {
    let legal: Vec<&Card> = cards.iter().filter(|c| c.is_commander_legal()).collect();
    let mut pairs = Vec::new();
    for (i, first) in legal.iter().enumerate() {
        for second in &legal[i + 1..] {
            if first.name != second.name && covers(first, second, colors) {
                pairs.push(CandidateCommander::pair(
                    kind,
                    (*first).clone(),
                    (*second).clone(),
                ));
            }
        }
    }
    pairs
}

/// Pairs of cards that name each other, when both appear in `cards`.
pub fn partner_with_pairs(cards: &[Card], colors: &ColorIdentity) -> Vec<CandidateCommander> {
    let by_name: HashMap<&str, &Card> = cards.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut pairs: Vec<CandidateCommander> = Vec::new();

    for first in cards {
        let Some(partner_name) = first.partner_with_name() else {
            debug!("{} names no legendary partner", first.name);
            continue;
        };
        let Some(second) = by_name.get(partner_name) else {
            debug!("{}'s partner {} is not in the result set", first.name, partner_name);
            continue;
        };
        if !first.is_commander_legal() || !second.is_commander_legal() {
            continue;
        }
        if !covers(first, second, colors) {
            continue;
        }
        let candidate =
            CandidateCommander::pair(PairKind::PartnerWith, first.clone(), (*second).clone());
        if !pairs.iter().any(|p| p.name == candidate.name) {
            pairs.push(candidate);
        }
    }
    pairs
}

/// One member from each side. Naming follows `CandidateCommander::pair`.
pub fn cross_pairs(
    kind: PairKind,
    firsts: &[Card],
    seconds: &[Card],
    colors: &ColorIdentity,
) -> Vec<CandidateCommander> {
    firsts
        .iter()
        .filter(|c| c.is_commander_legal())
        .flat_map(|first| {
            seconds
                .iter()
                .filter(move |second| {
                    second.is_commander_legal() && covers(first, second, colors)
                })
                .map(move |second| CandidateCommander::pair(kind, first.clone(), second.clone()))
        })
        .collect()
}
