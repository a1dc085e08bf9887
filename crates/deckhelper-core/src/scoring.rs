use crate::{Collection, SynergyRecord};
use serde::{Deserialize, Serialize};

/// Point values and thresholds of the synergy score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub match_base: u32,
    pub card_is_commander: u32,
    pub high_synergy: u32,
    pub high_inclusion: u32,
    pub synergy_threshold: f64,
    pub inclusion_threshold: f64,
    pub scale: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            match_base: 2,
            card_is_commander: 2,
            high_synergy: 1,
            high_inclusion: 1,
            synergy_threshold: 0.3,
            inclusion_threshold: 0.4,
            scale: 2.5,
        }
    }
}

/// Raw points a collection earns against one commander's synergy data.
pub fn accumulate(
    commander_name: &str,
    collection: &Collection,
    records: &[SynergyRecord],
    weights: &ScoreWeights,
) -> u32 {
    let mut total = 0;
    for card in collection {
        if card.name == commander_name {
            total += weights.card_is_commander;
        }
        for record in records.iter().filter(|r| r.name == card.name) {
            total += weights.match_base;
            if record.synergy >= weights.synergy_threshold {
                total += weights.high_synergy;
            }
            if record
                .inclusion_ratio()
                .is_some_and(|ratio| ratio >= weights.inclusion_threshold)
            {
                total += weights.high_inclusion;
            }
        }
    }
    total
}

/// Suitability of a commander for a collection, nominally 0..=10.
///
/// Not clamped: a small collection with stacked bonuses can exceed 10.
pub fn score_collection(
    commander_name: &str,
    collection: &Collection,
    records: &[SynergyRecord],
    weights: &ScoreWeights,
) -> u32 {
    if collection.is_empty() {
        return 0;
    }
    let total = accumulate(commander_name, collection, records, weights);
    let scaled = total as f64 / collection.len() as f64 * weights.scale;
    scaled.round().max(0.0) as u32
}
