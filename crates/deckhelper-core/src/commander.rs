use crate::naming::{composite_name, ordered_composite_name};
use crate::{Card, ColorIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a candidate's command zone is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    Solo,
    Partner,
    PartnerWith,
    Background,
    DoctorCompanion,
    FriendsForever,
}

impl PairKind {
    pub fn is_pair(self) -> bool {
        self != PairKind::Solo
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PairKind::Solo => "solo",
            PairKind::Partner => "partner",
            PairKind::PartnerWith => "partner with",
            PairKind::Background => "background",
            PairKind::DoctorCompanion => "doctor's companion",
            PairKind::FriendsForever => "friends forever",
        };
        f.write_str(label)
    }
}

/// Card data behind a candidate: one record, or two for a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommanderData {
    Pair([Card; 2]),
    Solo(Card),
}

impl CommanderData {
    pub fn members(&self) -> &[Card] {
        match self {
            CommanderData::Pair(cards) => cards,
            CommanderData::Solo(card) => std::slice::from_ref(card),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCommander {
    pub name: String,
    pub kind: PairKind,
    pub data: CommanderData,
    #[serde(default)]
    pub score: u32,
}

impl CandidateCommander {
    pub fn solo(card: Card) -> Self {
        Self {
            name: card.name.clone(),
            kind: PairKind::Solo,
            data: CommanderData::Solo(card),
            score: 0,
        }
    }

    /// Builds a paired candidate. Doctor/companion pairs keep the declared order,
    /// every other pair is named with its members sorted.
    pub fn pair(kind: PairKind, first: Card, second: Card) -> Self {
        let name = match kind {
            PairKind::DoctorCompanion => ordered_composite_name(&first.name, &second.name),
            _ => composite_name(&first.name, &second.name),
        };
        Self {
            name,
            kind,
            data: CommanderData::Pair([first, second]),
            score: 0,
        }
    }

    pub fn members(&self) -> &[Card] {
        self.data.members()
    }

    pub fn color_identity(&self) -> ColorIdentity {
        self.members()
            .iter()
            .fold(ColorIdentity::new(), |acc, card| acc.union(&card.color_identity))
    }

    /// Every member passes the commander legality check.
    pub fn is_legal(&self) -> bool {
        self.members().iter().all(Card::is_commander_legal)
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.members().iter().flat_map(Card::image_urls).collect()
    }
}

/// Result of a scoring run, keyed by candidate name.
pub type ScoredCommanders = BTreeMap<String, CandidateCommander>;
