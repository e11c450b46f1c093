//! Save/restore of the in-progress game
//!
//! Features:
//! - JSON record compatible with saves from earlier releases
//!   (`{moves, secondsLapse, cards, openCards}`)
//! - Validation on load: symbol multiset, card ids, open-card consistency
//! - Open cards are saved as they stand, mid-mismatch included

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{Storage, StorageError};
use crate::sim::{Deck, DeckError, GameState, GameStats, OpenCards, Symbol};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed save: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid deck: {0}")]
    InvalidDeck(#[from] DeckError),
    #[error("inconsistent open cards: {0}")]
    Inconsistent(String),
}

/// Snapshot written on page exit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedGame {
    pub moves: u32,
    #[serde(rename = "secondsLapse")]
    pub elapsed_seconds: u32,
    pub cards: Deck,
    #[serde(rename = "openCards")]
    pub open_cards: OpenCards,
}

/// Record as read from storage, before the deck is checked
#[derive(Deserialize)]
struct SavedRecord {
    moves: u32,
    #[serde(rename = "secondsLapse")]
    elapsed_seconds: u32,
    cards: Vec<Symbol>,
    #[serde(rename = "openCards")]
    open_cards: OpenCards,
}

impl SavedGame {
    /// Snapshot a game. The second card of a pending mismatch is never in
    /// the open map, so the first one comes back face-up and unmatched.
    pub fn capture(state: &GameState) -> Self {
        Self {
            moves: state.moves,
            elapsed_seconds: state.timer.elapsed_seconds(),
            cards: state.deck.clone(),
            open_cards: state.open_cards.clone(),
        }
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            moves: self.moves,
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    /// Rebuild a game from this snapshot
    pub fn into_state(self, generation: u64) -> GameState {
        let stats = self.stats();
        GameState::restored(self.cards, self.open_cards, stats, generation)
    }

    /// Reject snapshots that no sequence of reveals could have produced
    pub fn validate(&self) -> Result<(), PersistenceError> {
        let unmatched = self.open_cards.unmatched_count();
        if unmatched > 1 {
            return Err(PersistenceError::Inconsistent(format!(
                "{} unmatched open cards",
                unmatched
            )));
        }

        for symbol in Symbol::ALL {
            let matched = self
                .open_cards
                .iter()
                .filter(|(id, matched)| *matched && self.cards.symbol(*id) == symbol)
                .count();
            if matched == 1 {
                return Err(PersistenceError::Inconsistent(format!(
                    "{} matched without its pair",
                    symbol.as_str()
                )));
            }
        }

        Ok(())
    }
}

pub fn encode(saved: &SavedGame) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(saved)?)
}

pub fn decode(json: &str) -> Result<SavedGame, PersistenceError> {
    let record: SavedRecord = serde_json::from_str(json)?;
    let saved = SavedGame {
        moves: record.moves,
        elapsed_seconds: record.elapsed_seconds,
        cards: Deck::from_symbols(record.cards)?,
        open_cards: record.open_cards,
    };
    saved.validate()?;
    Ok(saved)
}

/// Write the snapshot under `key`
pub fn save<S: Storage + ?Sized>(
    storage: &mut S,
    key: &str,
    saved: &SavedGame,
) -> Result<(), PersistenceError> {
    let json = encode(saved)?;
    storage.set_item(key, &json)?;
    log::info!(
        "Game saved ({} moves, {} open cards)",
        saved.moves,
        saved.open_cards.len()
    );
    Ok(())
}

/// Read the snapshot under `key`. `Ok(None)` means there is no saved game.
pub fn load<S: Storage + ?Sized>(storage: &S, key: &str) -> Result<Option<SavedGame>, PersistenceError> {
    match storage.get_item(key)? {
        Some(json) => decode(&json).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SAVE_KEY;
    use crate::platform::MemoryStorage;
    use crate::sim::{CardFace, CardId, RevealOutcome, reveal, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn id(index: usize) -> CardId {
        CardId::new(index).unwrap()
    }

    /// Record as earlier releases write it
    const LEGACY_RECORD: &str = r#"{
        "moves": 5,
        "secondsLapse": 42,
        "cards": ["diamond","paper-plane-o","anchor","bolt","cube","leaf","bicycle","bomb",
                  "diamond","paper-plane-o","anchor","bolt","cube","leaf","bicycle","bomb"],
        "openCards": {"card-0": true, "card-8": true, "card-3": false}
    }"#;

    #[test]
    fn test_round_trip_through_storage() {
        let mut state = GameState::new(Deck::shuffled(&mut Pcg32::seed_from_u64(11)), 0);
        let first = id(0);
        let partner = state.deck.partner(first);
        reveal(&mut state, first);
        tick(&mut state);
        tick(&mut state);
        reveal(&mut state, partner);
        let third = CardId::all()
            .find(|c| !state.open_cards.contains(*c))
            .unwrap();
        reveal(&mut state, third);

        let mut storage = MemoryStorage::new();
        save(&mut storage, SAVE_KEY, &SavedGame::capture(&state)).unwrap();
        let restored = load(&storage, SAVE_KEY).unwrap().unwrap().into_state(1);

        assert_eq!(restored.moves, state.moves);
        assert_eq!(restored.timer.elapsed_seconds(), 2);
        assert_eq!(restored.deck, state.deck);
        assert_eq!(restored.open_cards, state.open_cards);
    }

    #[test]
    fn test_missing_record_is_none() {
        let storage = MemoryStorage::new();
        assert!(load(&storage, SAVE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_reads_legacy_record() {
        let saved = decode(LEGACY_RECORD).unwrap();
        assert_eq!(saved.moves, 5);
        assert_eq!(saved.elapsed_seconds, 42);
        assert_eq!(saved.cards, Deck::ordered());
        assert_eq!(
            saved.open_cards.iter().collect::<Vec<_>>(),
            vec![(id(0), true), (id(8), true), (id(3), false)]
        );
    }

    #[test]
    fn test_writes_legacy_field_names() {
        let saved = decode(LEGACY_RECORD).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encode(&saved).unwrap()).unwrap();
        assert_eq!(value["secondsLapse"], 42);
        assert_eq!(value["cards"][1], "paper-plane-o");
        assert_eq!(value["openCards"]["card-3"], false);
    }

    #[test]
    fn test_malformed_records_fail() {
        let missing_field = r#"{"moves": 1, "cards": [], "openCards": {}}"#;
        assert!(matches!(decode(missing_field), Err(PersistenceError::Malformed(_))));

        let wrong_type = LEGACY_RECORD.replace("\"moves\": 5", "\"moves\": \"5\"");
        assert!(matches!(decode(&wrong_type), Err(PersistenceError::Malformed(_))));

        let negative = LEGACY_RECORD.replace("\"moves\": 5", "\"moves\": -5");
        assert!(matches!(decode(&negative), Err(PersistenceError::Malformed(_))));

        let unknown_symbol = LEGACY_RECORD.replacen("\"bomb\"", "\"star\"", 1);
        assert!(matches!(decode(&unknown_symbol), Err(PersistenceError::Malformed(_))));

        assert!(decode("not json").is_err());
    }

    #[test]
    fn test_unbalanced_deck_fails() {
        let unbalanced = LEGACY_RECORD.replacen("\"bomb\"", "\"bolt\"", 1);
        assert!(matches!(
            decode(&unbalanced),
            Err(PersistenceError::InvalidDeck(_))
        ));

        let short = r#"{"moves": 0, "secondsLapse": 0, "cards": ["bomb", "bomb"], "openCards": {}}"#;
        assert!(matches!(decode(short), Err(PersistenceError::InvalidDeck(_))));
    }

    #[test]
    fn test_inconsistent_open_cards_fail() {
        let two_unmatched = LEGACY_RECORD.replace("\"card-8\": true", "\"card-8\": false");
        assert!(matches!(
            decode(&two_unmatched),
            Err(PersistenceError::Inconsistent(_))
        ));

        // card-0 and card-1 are different symbols
        let lone_match = LEGACY_RECORD.replace("\"card-8\": true", "\"card-1\": true");
        assert!(matches!(
            decode(&lone_match),
            Err(PersistenceError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_save_during_mismatch_keeps_open_cards() {
        let mut state = GameState::new(Deck::ordered(), 0);
        reveal(&mut state, id(0));
        let outcome = reveal(&mut state, id(1));
        assert!(matches!(outcome, RevealOutcome::Mismatch { .. }));

        let mut storage = MemoryStorage::new();
        save(&mut storage, SAVE_KEY, &SavedGame::capture(&state)).unwrap();
        let saved = load(&storage, SAVE_KEY).unwrap().unwrap();

        assert_eq!(saved.moves, 2);
        assert_eq!(saved.open_cards, state.open_cards);
        assert_eq!(saved.open_cards.iter().collect::<Vec<_>>(), vec![(id(0), false)]);

        let restored = saved.into_state(1);
        assert!(!restored.is_locked());
        assert_eq!(restored.card_face(id(0)), CardFace::Revealed);
        assert_eq!(restored.card_face(id(1)), CardFace::Hidden);
    }
}
