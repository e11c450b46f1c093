//! Matching Game - a memory card matching game for the browser
//!
//! Core modules:
//! - `sim`: Card-flip state machine (deck, open cards, scoring, timer)
//! - `controller`: Drives the state machine and reflects it through a presenter
//! - `persistence`: Save/restore of the in-progress game
//! - `platform`: Browser/native storage abstraction
//! - `settings`: Player preferences
//! - `ui`: Presentation adapter contract and implementations

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod controller;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use controller::GameController;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Cards on the board
    pub const DECK_SIZE: usize = 16;
    /// Distinct symbols, each dealt twice
    pub const PAIR_COUNT: usize = DECK_SIZE / 2;

    /// Star rating thresholds (inclusive upper bounds on moves)
    pub const THREE_STAR_MAX_MOVES: u32 = 45;
    pub const TWO_STAR_MAX_MOVES: u32 = 70;

    /// How long a mismatched pair stays face-up before hiding (ms)
    pub const MISMATCH_DELAY_MS: i32 = 500;
    /// Game clock resolution (ms)
    pub const TIMER_INTERVAL_MS: i32 = 1000;

    /// Storage key for the in-progress game
    pub const SAVE_KEY: &str = "sarahMatchingGame";
    /// Storage key for player preferences
    pub const SETTINGS_KEY: &str = "sarahMatchingGame.settings";

    /// Viewport widths (px) below which the grid narrows to 2 or 3 columns
    pub const NARROW_VIEWPORT: f64 = 454.0;
    pub const MEDIUM_VIEWPORT: f64 = 634.0;
}

/// Format elapsed seconds as `HH:MM:SS`
pub fn format_time(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
