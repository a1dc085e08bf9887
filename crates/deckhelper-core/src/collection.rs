use crate::{Card, ColorIdentity};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The cards a user has added, keyed by name.
///
/// Insertion order is kept for display; scoring does not depend on it.
/// Serializes as a JSON object of `name -> card`, the shape the page submits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    cards: Vec<Card>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card, replacing a card of the same name in place.
    pub fn insert(&mut self, card: Card) -> Option<Card> {
        match self.position(&card.name) {
            Some(idx) => Some(std::mem::replace(&mut self.cards[idx], card)),
            None => {
                self.cards.push(card);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Card> {
        self.position(name).map(|idx| self.cards.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&Card> {
        self.position(name).map(|idx| &self.cards[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.name.as_str())
    }

    /// Union of every card's color identity.
    pub fn color_identity(&self) -> ColorIdentity {
        self.cards
            .iter()
            .flat_map(|card| card.color_identity.iter())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.name == name)
    }
}

impl FromIterator<Card> for Collection {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for card in iter {
            collection.insert(card);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cards.len()))?;
        for card in &self.cards {
            map.serialize_entry(&card.name, card)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = Collection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of card name to card record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Collection, A::Error> {
                let mut collection = Collection::new();
                // The record's own name is authoritative; the key is only a label.
                while let Some((_key, card)) = access.next_entry::<String, Card>()? {
                    collection.insert(card);
                }
                Ok(collection)
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
