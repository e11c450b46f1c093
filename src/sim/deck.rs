//! Card symbols, card identifiers and the shuffled deck

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DECK_SIZE, PAIR_COUNT};

/// Card face symbols (named after their Font Awesome icons)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbol {
    Diamond,
    #[serde(rename = "paper-plane-o")]
    PaperPlane,
    Anchor,
    Bolt,
    Cube,
    Leaf,
    Bicycle,
    Bomb,
}

impl Symbol {
    pub const ALL: [Symbol; PAIR_COUNT] = [
        Symbol::Diamond,
        Symbol::PaperPlane,
        Symbol::Anchor,
        Symbol::Bolt,
        Symbol::Cube,
        Symbol::Leaf,
        Symbol::Bicycle,
        Symbol::Bomb,
    ];

    /// Icon name, as stored in saves and used for the `fa-` class
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Diamond => "diamond",
            Symbol::PaperPlane => "paper-plane-o",
            Symbol::Anchor => "anchor",
            Symbol::Bolt => "bolt",
            Symbol::Cube => "cube",
            Symbol::Leaf => "leaf",
            Symbol::Bicycle => "bicycle",
            Symbol::Bomb => "bomb",
        }
    }
}

/// Position of a card on the board (0..16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u8);

impl CardId {
    /// Returns `None` for positions off the board
    pub fn new(index: usize) -> Option<Self> {
        (index < DECK_SIZE).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Element id of the card (`card-N`)
    pub fn dom_id(self) -> String {
        format!("card-{}", self.0)
    }

    /// Parse `card-N` or a bare `N`
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("card-").unwrap_or(raw);
        digits.parse::<usize>().ok().and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = CardId> {
        (0..DECK_SIZE as u8).map(CardId)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// A dealt card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck has {0} cards, expected 16")]
    WrongSize(usize),
    #[error("symbol {} appears {count} times, expected 2", .symbol.as_str())]
    Unbalanced { symbol: Symbol, count: usize },
}

/// Arrangement of the 16 cards: every symbol exactly twice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<Symbol>")]
pub struct Deck {
    symbols: [Symbol; DECK_SIZE],
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered()
    }
}

impl Deck {
    /// Unshuffled deck: all symbols, then all symbols again
    pub fn ordered() -> Self {
        let mut symbols = [Symbol::Diamond; DECK_SIZE];
        for (i, slot) in symbols.iter_mut().enumerate() {
            *slot = Symbol::ALL[i % PAIR_COUNT];
        }
        Self { symbols }
    }

    /// Fresh shuffled deck
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.shuffle(rng);
        deck
    }

    /// Uniform in-place permutation (Fisher-Yates)
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.symbols.shuffle(rng);
    }

    /// Build a deck from an explicit arrangement, checking the symbol multiset
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self, DeckError> {
        let symbols: [Symbol; DECK_SIZE] = symbols
            .try_into()
            .map_err(|rejected: Vec<Symbol>| DeckError::WrongSize(rejected.len()))?;

        for symbol in Symbol::ALL {
            let count = symbols.iter().filter(|s| **s == symbol).count();
            if count != 2 {
                return Err(DeckError::Unbalanced { symbol, count });
            }
        }

        Ok(Self { symbols })
    }

    pub fn symbol(&self, id: CardId) -> Symbol {
        self.symbols[id.index()]
    }

    pub fn card(&self, id: CardId) -> Card {
        Card {
            id,
            symbol: self.symbol(id),
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        CardId::all().map(|id| self.card(id))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The other card carrying the same symbol
    pub fn partner(&self, id: CardId) -> CardId {
        let symbol = self.symbol(id);
        CardId::all()
            .find(|other| *other != id && self.symbol(*other) == symbol)
            .unwrap_or(id)
    }
}

impl From<Deck> for Vec<Symbol> {
    fn from(deck: Deck) -> Self {
        deck.symbols.to_vec()
    }
}
