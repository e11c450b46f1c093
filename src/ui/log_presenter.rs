//! Presenter for native builds: keeps a text board and logs every change

use super::{Presenter, Sound};
use crate::consts::DECK_SIZE;
use crate::sim::{CardFace, CardId, Deck, StarRating, Symbol};

#[derive(Debug, Clone)]
pub struct LogPresenter {
    symbols: Vec<Symbol>,
    faces: [CardFace; DECK_SIZE],
    columns: usize,
    moves: u32,
    stars: u8,
    time: String,
    won: bool,
    audio_enabled: bool,
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl LogPresenter {
    pub fn new(columns: usize) -> Self {
        Self {
            symbols: Vec::new(),
            faces: [CardFace::Hidden; DECK_SIZE],
            columns: columns.max(1),
            moves: 0,
            stars: 3,
            time: "00:00:00".to_string(),
            won: false,
            audio_enabled: true,
        }
    }

    /// Board as text: `??` hidden, symbol initials when face-up, `[..]` matched
    pub fn board(&self) -> String {
        let mut out = String::new();
        for (i, face) in self.faces.iter().enumerate() {
            let name = self.symbols.get(i).map(|s| &s.as_str()[..2]).unwrap_or("--");
            let cell = match face {
                CardFace::Hidden => " ?? ".to_string(),
                CardFace::Revealed => format!(" {} ", name),
                CardFace::Matched => format!("[{}]", name),
            };
            out.push_str(&cell);
            if (i + 1) % self.columns == 0 {
                out.push('\n');
            }
        }
        out.push_str(&format!(
            "moves {} | stars {} | time {} | sound {}",
            self.moves,
            self.stars,
            self.time,
            if self.audio_enabled { "on" } else { "off" }
        ));
        if self.won {
            out.push_str(" | won");
        }
        out
    }
}

impl Presenter for LogPresenter {
    fn render_deck(&mut self, deck: &Deck) {
        self.symbols = deck.symbols().to_vec();
        self.faces = [CardFace::Hidden; DECK_SIZE];
        log::debug!("Deck dealt");
    }

    fn set_card_face(&mut self, card: CardId, face: CardFace) {
        self.faces[card.index()] = face;
        log::debug!("{} -> {:?}", card, face);
    }

    fn set_moves(&mut self, moves: u32) {
        self.moves = moves;
    }

    fn set_stars(&mut self, stars: StarRating) {
        self.stars = stars.count();
    }

    fn set_time(&mut self, time: &str) {
        self.time = time.to_string();
    }

    fn show_win_panel(&mut self, moves: u32, stars: StarRating, time: &str) {
        self.won = true;
        log::info!(
            "You Win! {} moves, {} stars, time {}",
            moves,
            stars.count(),
            time
        );
    }

    fn hide_win_panel(&mut self) {
        self.won = false;
    }

    fn play_sound(&mut self, sound: Sound) {
        log::debug!("play {:?}", sound);
    }

    fn stop_sound(&mut self, sound: Sound) {
        log::debug!("stop {:?}", sound);
    }

    fn set_audio_indicator(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }
}
