//! Game state and core types
//!
//! Everything a game needs to continue after a reload lives here, plus the
//! transient mismatch lock which is never persisted.

use super::deck::{CardId, Deck};
use super::open_cards::OpenCards;
use super::scoring::StarRating;
use super::timer::GameTimer;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Accepting reveals
    Playing,
    /// A mismatched pair is face-up; input is locked until it is hidden
    Resolving,
    /// All pairs found
    Won,
}

/// What a card currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Hidden,
    Revealed,
    Matched,
}

/// Moves and time, as reported to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    pub moves: u32,
    pub elapsed_seconds: u32,
}

impl GameStats {
    pub fn stars(&self) -> StarRating {
        StarRating::from_moves(self.moves)
    }
}

/// Handle for a scheduled mismatch rollback
///
/// Only the token matching the current game's pending rollback is honoured;
/// tokens from an earlier game (or an already resolved rollback) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackToken {
    pub generation: u64,
    /// Card that was already face-up
    pub open_card: CardId,
    /// Card whose reveal caused the mismatch
    pub revealed_card: CardId,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub deck: Deck,
    pub open_cards: OpenCards,
    pub moves: u32,
    pub timer: GameTimer,
    pub phase: GamePhase,
    /// Pending mismatch rollback (present iff phase is Resolving)
    pending: Option<RollbackToken>,
    /// Distinguishes this game from earlier ones for stale callbacks
    generation: u64,
}

impl GameState {
    /// Fresh game on the given arrangement
    pub fn new(deck: Deck, generation: u64) -> Self {
        Self {
            deck,
            open_cards: OpenCards::new(),
            moves: 0,
            timer: GameTimer::new(),
            phase: GamePhase::Playing,
            pending: None,
            generation,
        }
    }

    /// Game continued from a snapshot. The clock stays idle until the next
    /// reveal, unless the snapshot is already won.
    pub fn restored(
        deck: Deck,
        open_cards: OpenCards,
        stats: GameStats,
        generation: u64,
    ) -> Self {
        let mut timer = GameTimer::resumed(stats.elapsed_seconds);
        let phase = if open_cards.is_complete() {
            timer.stop();
            GamePhase::Won
        } else {
            GamePhase::Playing
        };

        Self {
            deck,
            open_cards,
            moves: stats.moves,
            timer,
            phase,
            pending: None,
            generation,
        }
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            moves: self.moves,
            elapsed_seconds: self.timer.elapsed_seconds(),
        }
    }

    pub fn stars(&self) -> StarRating {
        StarRating::from_moves(self.moves)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_rollback(&self) -> Option<RollbackToken> {
        self.pending
    }

    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// Lock input until the given rollback completes
    pub(crate) fn lock(&mut self, open_card: CardId, revealed_card: CardId) -> RollbackToken {
        let token = RollbackToken {
            generation: self.generation,
            open_card,
            revealed_card,
        };
        self.pending = Some(token);
        self.phase = GamePhase::Resolving;
        token
    }

    pub(crate) fn unlock(&mut self) {
        self.pending = None;
        if self.phase == GamePhase::Resolving {
            self.phase = GamePhase::Playing;
        }
    }

    /// Face shown for a card, including the unlisted half of a mismatch
    pub fn card_face(&self, id: CardId) -> CardFace {
        match self.open_cards.get(id) {
            Some(true) => CardFace::Matched,
            Some(false) => CardFace::Revealed,
            None if self.pending.is_some_and(|t| t.revealed_card == id) => CardFace::Revealed,
            None => CardFace::Hidden,
        }
    }
}
