//! Presentation layer
//!
//! The game core never renders anything itself. A [`Presenter`] receives the
//! resulting state changes; the DOM presenter drives the page, the log
//! presenter backs the native build.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod keyboard;
pub mod log_presenter;

pub use log_presenter::LogPresenter;

use crate::sim::{CardFace, CardId, Deck, StarRating};

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Two open cards matched
    Match,
    /// Two open cards did not match
    Mismatch,
    /// All pairs found
    Win,
    /// Looping background music
    Background,
}

/// Everything the game needs from its view
pub trait Presenter {
    /// Lay out all cards face-down
    fn render_deck(&mut self, deck: &Deck);
    fn set_card_face(&mut self, card: CardId, face: CardFace);
    fn set_moves(&mut self, moves: u32);
    fn set_stars(&mut self, stars: StarRating);
    /// Elapsed time, already formatted as `HH:MM:SS`
    fn set_time(&mut self, time: &str);
    fn show_win_panel(&mut self, moves: u32, stars: StarRating, time: &str);
    fn hide_win_panel(&mut self);
    /// Failures are the presenter's to log; they never reach the game
    fn play_sound(&mut self, sound: Sound);
    fn stop_sound(&mut self, sound: Sound);
    /// Sound control icon
    fn set_audio_indicator(&mut self, enabled: bool);
}
