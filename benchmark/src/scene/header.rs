//! Ordered ground-truth header record

use shared::fits::{HeaderCard, HeaderValue};

/// Ordered set of ground-truth header cards.
///
/// Setting a key that is already present replaces its value and comment but
/// keeps the position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderRecord {
    cards: Vec<HeaderCard>,
}

impl HeaderRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<HeaderValue>,
        comment: impl Into<String>,
    ) {
        let card = HeaderCard::new(key, value, comment);
        match self.cards.iter_mut().find(|existing| existing.key == card.key) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|card| card.key == key)
            .map(|card| &card.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderCard> {
        self.cards.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|card| card.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<HeaderCard> {
        self.cards
    }
}
