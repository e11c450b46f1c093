//! Face-up cards and whether each one is a confirmed match
//!
//! Entries keep insertion order. Serialized as a JSON object keyed by the
//! card's element id (`{"card-3": false}`), in that same order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::deck::CardId;
use crate::consts::DECK_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenCards {
    entries: Vec<(CardId, bool)>,
}

impl OpenCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.entries.iter().any(|(open, _)| *open == id)
    }

    /// Matched flag for an open card, `None` if the card is not open
    pub fn get(&self, id: CardId) -> Option<bool> {
        self.entries
            .iter()
            .find(|(open, _)| *open == id)
            .map(|(_, matched)| *matched)
    }

    /// Add a card as face-up but unmatched. No-op if already open.
    pub fn insert_unmatched(&mut self, id: CardId) {
        if !self.contains(id) {
            self.entries.push((id, false));
        }
    }

    /// Flag an open card as matched, or add it already matched
    pub fn insert_matched(&mut self, id: CardId) {
        match self.entries.iter_mut().find(|(open, _)| *open == id) {
            Some((_, matched)) => *matched = true,
            None => self.entries.push((id, true)),
        }
    }

    pub fn remove(&mut self, id: CardId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(open, _)| *open != id);
        self.entries.len() != before
    }

    /// First unmatched entry in insertion order
    pub fn first_unmatched(&self) -> Option<CardId> {
        self.entries
            .iter()
            .find(|(_, matched)| !matched)
            .map(|(id, _)| *id)
    }

    pub fn unmatched_count(&self) -> usize {
        self.entries.iter().filter(|(_, matched)| !matched).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every card on the board is open and matched
    pub fn is_complete(&self) -> bool {
        self.entries.len() == DECK_SIZE && self.entries.iter().all(|(_, matched)| *matched)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, bool)> + '_ {
        self.entries.iter().copied()
    }
}

impl Serialize for OpenCards {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, matched) in &self.entries {
            map.serialize_entry(&id.dom_id(), matched)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OpenCards {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OpenCardsVisitor)
    }
}

struct OpenCardsVisitor;

impl<'de> Visitor<'de> for OpenCardsVisitor {
    type Value = OpenCards;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of card ids to matched flags")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        use serde::de::Error;

        let mut cards = OpenCards::new();
        while let Some((key, matched)) = access.next_entry::<String, bool>()? {
            let id = CardId::parse(&key)
                .ok_or_else(|| A::Error::custom(format!("unknown card id {:?}", key)))?;
            if cards.contains(id) {
                return Err(A::Error::custom(format!("duplicate card id {:?}", key)));
            }
            cards.entries.push((id, matched));
        }
        Ok(cards)
    }
}
