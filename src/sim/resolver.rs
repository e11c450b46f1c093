//! Card reveal resolution
//!
//! Every state transition of a game goes through one of these functions.
//! They are synchronous and never touch the presentation layer; the caller
//! reflects the returned outcome and schedules the mismatch rollback.

use super::deck::CardId;
use super::state::{GamePhase, GameState, GameStats, RollbackToken};

/// Result of a single reveal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Card already open, or game already won
    Ignored,
    /// A mismatched pair is still showing
    Locked,
    /// First card of a pair is now face-up
    FirstCard { card: CardId },
    /// Card matched the open one
    PairMatched { card: CardId, partner: CardId },
    /// Card did not match. Call [`complete_rollback`] with the token after
    /// the mismatch delay.
    Mismatch { token: RollbackToken },
    /// Last pair matched
    Won {
        card: CardId,
        partner: CardId,
        stats: GameStats,
    },
}

/// Turn a card face-up and resolve it against the open cards
pub fn reveal(state: &mut GameState, card: CardId) -> RevealOutcome {
    match state.phase {
        GamePhase::Won => return RevealOutcome::Ignored,
        GamePhase::Resolving => return RevealOutcome::Locked,
        GamePhase::Playing => {}
    }

    if state.open_cards.contains(card) {
        return RevealOutcome::Ignored;
    }

    state.timer.start();
    state.moves = state.moves.saturating_add(1);

    let Some(open_card) = state.open_cards.first_unmatched() else {
        state.open_cards.insert_unmatched(card);
        return RevealOutcome::FirstCard { card };
    };

    if state.deck.symbol(open_card) != state.deck.symbol(card) {
        let token = state.lock(open_card, card);
        return RevealOutcome::Mismatch { token };
    }

    state.open_cards.insert_matched(open_card);
    state.open_cards.insert_matched(card);

    if state.open_cards.is_complete() {
        state.timer.stop();
        state.phase = GamePhase::Won;
        RevealOutcome::Won {
            card,
            partner: open_card,
            stats: state.stats(),
        }
    } else {
        RevealOutcome::PairMatched {
            card,
            partner: open_card,
        }
    }
}

/// Hide a mismatched pair and release the input lock.
///
/// Returns the two cards to hide, or `None` if the token is stale.
pub fn complete_rollback(state: &mut GameState, token: RollbackToken) -> Option<(CardId, CardId)> {
    if state.pending_rollback() != Some(token) {
        return None;
    }
    state.open_cards.remove(token.open_card);
    state.unlock();
    Some((token.open_card, token.revealed_card))
}

/// Start the clock without revealing a card (keyboard focus entering the
/// board). Returns true if the clock was started.
pub fn begin(state: &mut GameState) -> bool {
    if state.is_won() {
        return false;
    }
    state.timer.start()
}

/// One second of wall time passed. Returns the new elapsed total if the
/// clock is running.
pub fn tick(state: &mut GameState) -> Option<u32> {
    state.timer.tick()
}
