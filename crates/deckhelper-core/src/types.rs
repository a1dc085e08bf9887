use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// One of the five mana colors, ordered W U B R G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Color::from_letter(c).ok_or_else(|| format!("unknown color letter: {:?}", s))
            }
            _ => Err(format!("expected a single color letter, got {:?}", s)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.letter().to_string()
    }
}

/// A set of colors, serialized as an array of letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorIdentity(BTreeSet<Color>);

impl ColorIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, color: Color) -> bool {
        self.0.insert(color)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0.contains(&color)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.0.iter().copied()
    }

    pub fn is_superset(&self, other: &ColorIdentity) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn union(&self, other: &ColorIdentity) -> ColorIdentity {
        ColorIdentity(self.0.union(&other.0).copied().collect())
    }

    /// Colors of `target` that this identity does not provide.
    pub fn deficit(&self, target: &ColorIdentity) -> ColorIdentity {
        ColorIdentity(target.0.difference(&self.0).copied().collect())
    }

    /// Letters in WUBRG order, e.g. `"UBG"`.
    pub fn letters(&self) -> String {
        self.0.iter().map(|c| c.letter()).collect()
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "C")
        } else {
            write!(f, "{}", self.letters())
        }
    }
}

impl FromStr for ColorIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| Color::from_letter(c).ok_or_else(|| format!("unknown color letter: {:?}", c)))
            .collect()
    }
}

impl FromIterator<Color> for ColorIdentity {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        ColorIdentity(iter.into_iter().collect())
    }
}

impl Extend<Color> for ColorIdentity {
    fn extend<I: IntoIterator<Item = Color>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Entry of a card's `all_parts` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedCard {
    #[serde(default)]
    pub object: String,
    pub name: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// A card record as returned by the card database.
///
/// Only the fields the helper reads are typed; everything else is kept in `extra`
/// so a record posted by the page serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub color_identity: ColorIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub legalities: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scryfall_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_parts: Option<Vec<RelatedCard>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Card {
    pub fn new(name: impl Into<String>, colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            name: name.into(),
            color_identity: colors.into_iter().collect(),
            type_line: None,
            oracle_text: None,
            legalities: BTreeMap::new(),
            image_uris: None,
            card_faces: None,
            scryfall_uri: None,
            all_parts: None,
            extra: JsonMap::new(),
        }
    }

    pub fn colorless(name: impl Into<String>) -> Self {
        Self::new(name, std::iter::empty())
    }

    pub fn with_legality(mut self, format: &str, status: &str) -> Self {
        self.legalities.insert(format.to_string(), status.to_string());
        self
    }

    pub fn commander_legal(self) -> Self {
        self.with_legality("commander", "legal")
    }

    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = Some(type_line.into());
        self
    }

    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = Some(text.into());
        self
    }

    pub fn with_image(mut self, png: impl Into<String>) -> Self {
        self.image_uris = Some(ImageUris {
            png: Some(png.into()),
            extra: JsonMap::new(),
        });
        self
    }

    pub fn with_related(mut self, name: impl Into<String>, type_line: impl Into<String>) -> Self {
        self.all_parts.get_or_insert_with(Vec::new).push(RelatedCard {
            object: "related_card".to_string(),
            name: name.into(),
            type_line: type_line.into(),
            extra: JsonMap::new(),
        });
        self
    }

    pub fn is_commander_legal(&self) -> bool {
        self.legalities
            .get("commander")
            .is_some_and(|status| status == "legal")
    }

    /// PNG image references: the card's own, or one per face for double-faced cards.
    pub fn image_urls(&self) -> Vec<String> {
        if let Some(png) = self.image_uris.as_ref().and_then(|u| u.png.clone()) {
            return vec![png];
        }
        self.card_faces
            .iter()
            .flatten()
            .filter_map(|face| face.image_uris.as_ref().and_then(|u| u.png.clone()))
            .collect()
    }

    /// Name of the legendary card this one is printed to partner with.
    pub fn partner_with_name(&self) -> Option<&str> {
        self.all_parts
            .iter()
            .flatten()
            .filter(|part| {
                part.object == "related_card"
                    && part.name != self.name
                    && part.type_line.contains("Legendary")
            })
            .map(|part| part.name.as_str())
            .last()
    }
}

/// One row of a commander's synergy data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRecord {
    pub name: String,
    #[serde(default)]
    pub synergy: f64,
    #[serde(default)]
    pub num_decks: u64,
    #[serde(default)]
    pub potential_decks: u64,
}

impl SynergyRecord {
    /// `num_decks / potential_decks`, undefined when no deck could have played the card.
    pub fn inclusion_ratio(&self) -> Option<f64> {
        (self.potential_decks > 0).then(|| self.num_decks as f64 / self.potential_decks as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyPage {
    #[serde(default)]
    pub cardlist: Option<Vec<SynergyRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn color_letters_parse_case_insensitively() {
        assert_eq!("u".parse::<Color>().unwrap(), Color::Blue);
        assert_eq!("G".parse::<Color>().unwrap(), Color::Green);
        assert!("C".parse::<Color>().is_err());
        assert!("WU".parse::<Color>().is_err());
    }

    #[test]
    fn identity_letters_follow_wubrg_order() {
        let identity: ColorIdentity = [Color::Green, Color::White, Color::Black]
            .into_iter()
            .collect();
        assert_eq!(identity.letters(), "WBG");
        assert_eq!("g, w,b".parse::<ColorIdentity>().unwrap(), identity);
    }

    #[test]
    fn deficit_lists_missing_target_colors() {
        let target: ColorIdentity = "WUB".parse().unwrap();
        let card: ColorIdentity = "U".parse().unwrap();
        assert_eq!(card.deficit(&target).letters(), "WB");
        assert!(target.deficit(&target).is_empty());
    }

    #[test]
    fn card_record_round_trips_unknown_fields() {
        let raw = json!({
            "name": "Sol Ring",
            "color_identity": [],
            "legalities": {"commander": "legal", "vintage": "restricted"},
            "image_uris": {"png": "https://img/sol.png", "small": "https://img/s.jpg"},
            "scryfall_uri": "https://scryfall.com/card/sol-ring",
            "mana_cost": "{1}",
            "cmc": 1.0
        });
        let card: Card = serde_json::from_value(raw.clone()).unwrap();
        assert!(card.is_commander_legal());
        assert_eq!(card.image_urls(), vec!["https://img/sol.png".to_string()]);
        assert_eq!(serde_json::to_value(&card).unwrap(), raw);
    }

    #[test]
    fn double_faced_cards_expose_each_face_image() {
        let raw = json!({
            "name": "Esika, God of the Tree // The Prismatic Bridge",
            "color_identity": ["G"],
            "card_faces": [
                {"name": "Esika, God of the Tree", "image_uris": {"png": "front.png"}},
                {"name": "The Prismatic Bridge", "image_uris": {"png": "back.png"}}
            ]
        });
        let card: Card = serde_json::from_value(raw).unwrap();
        assert_eq!(card.image_urls(), vec!["front.png", "back.png"]);
        assert!(!card.is_commander_legal());
    }

    #[test]
    fn partner_with_skips_self_and_non_legendary_parts() {
        let card = Card::new("Pir, Imaginative Rascal", [Color::Green])
            .with_related("Pir, Imaginative Rascal", "Legendary Creature — Human")
            .with_related("Treasure", "Token Artifact — Treasure")
            .with_related("Toothy, Imaginary Friend", "Legendary Creature — Illusion");
        assert_eq!(card.partner_with_name(), Some("Toothy, Imaginary Friend"));
    }

    #[test]
    fn inclusion_ratio_is_undefined_without_potential_decks() {
        let record = SynergyRecord {
            name: "Sol Ring".into(),
            synergy: 0.1,
            num_decks: 5,
            potential_decks: 0,
        };
        assert_eq!(record.inclusion_ratio(), None);
    }

    #[test]
    fn synergy_page_without_cardlist_deserializes() {
        let page: SynergyPage = serde_json::from_value(json!({"header": "x"})).unwrap();
        assert!(page.cardlist.is_none());
    }
}
