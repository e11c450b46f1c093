//! Game-state core
//!
//! All gameplay rules live here. This module must stay free of platform code:
//! - No DOM, audio or storage access
//! - Randomness only through a caller-supplied RNG
//! - Deferred work (the mismatch rollback) is returned as a token, never scheduled

pub mod deck;
pub mod open_cards;
pub mod resolver;
pub mod scoring;
pub mod state;
pub mod timer;

pub use deck::{Card, CardId, Deck, DeckError, Symbol};
pub use open_cards::OpenCards;
pub use resolver::{RevealOutcome, begin, complete_rollback, reveal, tick};
pub use scoring::StarRating;
pub use state::{CardFace, GamePhase, GameState, GameStats, RollbackToken};
pub use timer::{GameTimer, TimerState};
