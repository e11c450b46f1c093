//! Game controller
//!
//! Owns the single [`GameState`] and sequences everything around it: the
//! presenter calls that follow each transition, sound cues, settings and the
//! snapshot written on exit. Platform glue only forwards input events and
//! schedules the two kinds of deferred work (clock ticks and mismatch
//! rollbacks) that come back through [`GameController::tick`] and
//! [`GameController::finish_rollback`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::SAVE_KEY;
use crate::format_time;
use crate::persistence::{self, PersistenceError, SavedGame};
use crate::platform::Storage;
use crate::settings::Settings;
use crate::sim::{self, CardFace, CardId, Deck, GameState, RevealOutcome, RollbackToken};
use crate::ui::{Presenter, Sound};

pub struct GameController<P: Presenter, S: Storage> {
    state: GameState,
    presenter: P,
    storage: S,
    settings: Settings,
    rng: Pcg32,
    /// Bumped on every restart so stale rollbacks can be told apart
    generation: u64,
}

impl<P: Presenter, S: Storage> GameController<P, S> {
    /// Continue the saved game if there is a readable one, otherwise deal a
    /// fresh game.
    pub fn new(presenter: P, storage: S, seed: u64) -> Self {
        let settings = Settings::load(&storage);
        let mut rng = Pcg32::seed_from_u64(seed);

        let saved = match persistence::load(&storage, SAVE_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Could not restore saved game, starting fresh: {}", e);
                None
            }
        };
        let restored = saved.is_some();
        let state = match saved {
            Some(saved) => saved.into_state(0),
            None => GameState::new(Deck::shuffled(&mut rng), 0),
        };

        let mut controller = Self {
            state,
            presenter,
            storage,
            settings,
            rng,
            generation: 0,
        };

        let audio_enabled = controller.settings.audio_enabled;
        controller.presenter.set_audio_indicator(audio_enabled);
        controller.render_all();

        if restored {
            log::info!(
                "Restored game ({} moves, {})",
                controller.state.moves,
                format_time(controller.state.timer.elapsed_seconds())
            );
        } else {
            log::info!("New game dealt");
        }

        if controller.state.is_won() {
            controller.show_result();
            controller.play(Sound::Win);
        } else {
            controller.play(Sound::Background);
        }

        controller
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Handle a click or Enter on card `index`.
    ///
    /// Unknown indices are ignored. On a mismatch the returned token must be
    /// passed to [`finish_rollback`](Self::finish_rollback) after
    /// `MISMATCH_DELAY_MS`.
    pub fn reveal(&mut self, index: usize) -> Option<RollbackToken> {
        let Some(card) = CardId::new(index) else {
            log::debug!("Ignoring reveal of unknown card {}", index);
            return None;
        };

        let outcome = sim::reveal(&mut self.state, card);
        log::debug!("Reveal {}: {:?}", card, outcome);

        let mut rollback = None;
        match outcome {
            RevealOutcome::Ignored | RevealOutcome::Locked => return None,
            RevealOutcome::FirstCard { card } => {
                self.presenter.set_card_face(card, CardFace::Revealed);
            }
            RevealOutcome::PairMatched { card, partner } => {
                self.presenter.set_card_face(partner, CardFace::Matched);
                self.presenter.set_card_face(card, CardFace::Matched);
                self.play(Sound::Match);
            }
            RevealOutcome::Mismatch { token } => {
                self.presenter.set_card_face(card, CardFace::Revealed);
                self.play(Sound::Mismatch);
                rollback = Some(token);
            }
            RevealOutcome::Won {
                card,
                partner,
                stats,
            } => {
                self.presenter.set_card_face(partner, CardFace::Matched);
                self.presenter.set_card_face(card, CardFace::Matched);
                self.presenter.stop_sound(Sound::Background);
                self.play(Sound::Win);
                log::info!(
                    "Game won in {} moves, {}",
                    stats.moves,
                    format_time(stats.elapsed_seconds)
                );
            }
        }

        self.presenter.set_moves(self.state.moves);
        self.presenter.set_stars(self.state.stars());
        if self.state.is_won() {
            self.show_result();
        }
        rollback
    }

    /// Hide a mismatched pair once its delay has passed. Stale tokens (from a
    /// game that has since been restarted) are dropped.
    pub fn finish_rollback(&mut self, token: RollbackToken) {
        match sim::complete_rollback(&mut self.state, token) {
            Some((open_card, revealed_card)) => {
                self.presenter.set_card_face(open_card, CardFace::Hidden);
                self.presenter.set_card_face(revealed_card, CardFace::Hidden);
            }
            None => log::debug!("Dropping stale rollback {:?}", token),
        }
    }

    /// Keyboard focus entered the board
    pub fn begin(&mut self) {
        if sim::begin(&mut self.state) {
            log::debug!("Clock started");
        }
    }

    /// One second of wall time passed
    pub fn tick(&mut self) {
        if let Some(seconds) = sim::tick(&mut self.state) {
            self.presenter.set_time(&format_time(seconds));
        }
    }

    /// Reshuffle and start over. Any pending rollback becomes stale.
    pub fn restart(&mut self) {
        self.presenter.stop_sound(Sound::Background);

        self.generation += 1;
        let mut deck = self.state.deck.clone();
        deck.shuffle(&mut self.rng);
        self.state = GameState::new(deck, self.generation);

        self.presenter.hide_win_panel();
        self.render_all();
        self.play(Sound::Background);
        log::info!("Game restarted");
    }

    /// Flip the sound control; game state is untouched
    pub fn toggle_audio(&mut self) {
        let enabled = self.settings.toggle_audio();
        self.settings.save(&mut self.storage);
        self.presenter.set_audio_indicator(enabled);
        if enabled {
            if !self.state.is_won() {
                self.play(Sound::Background);
            }
        } else {
            self.presenter.stop_sound(Sound::Background);
        }
    }

    /// Write the snapshot (page exit)
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let saved = SavedGame::capture(&self.state);
        persistence::save(&mut self.storage, SAVE_KEY, &saved)
    }

    fn play(&mut self, sound: Sound) {
        if self.settings.audio_enabled {
            self.presenter.play_sound(sound);
        }
    }

    fn show_result(&mut self) {
        let stats = self.state.stats();
        self.presenter.show_win_panel(
            stats.moves,
            stats.stars(),
            &format_time(stats.elapsed_seconds),
        );
    }

    /// Push the whole state to the presenter
    fn render_all(&mut self) {
        self.presenter.render_deck(&self.state.deck);
        for card in CardId::all() {
            let face = self.state.card_face(card);
            if face != CardFace::Hidden {
                self.presenter.set_card_face(card, face);
            }
        }
        self.presenter.set_moves(self.state.moves);
        self.presenter.set_stars(self.state.stars());
        self.presenter
            .set_time(&format_time(self.state.timer.elapsed_seconds()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SETTINGS_KEY;
    use crate::platform::MemoryStorage;
    use crate::sim::{StarRating, Symbol};

    /// Presenter that records what the game asked for
    #[derive(Default)]
    struct Recorder {
        faces: Vec<(CardId, CardFace)>,
        deals: u32,
        moves: u32,
        stars: Option<StarRating>,
        time: String,
        win_panels: u32,
        win_panel_shown: bool,
        played: Vec<Sound>,
        stopped: Vec<Sound>,
        audio_indicator: Option<bool>,
    }

    impl Recorder {
        fn face(&self, card: CardId) -> CardFace {
            self.faces
                .iter()
                .rev()
                .find(|(c, _)| *c == card)
                .map(|(_, f)| *f)
                .unwrap_or(CardFace::Hidden)
        }
    }

    impl Presenter for Recorder {
        fn render_deck(&mut self, _deck: &Deck) {
            self.deals += 1;
            self.faces.clear();
        }
        fn set_card_face(&mut self, card: CardId, face: CardFace) {
            self.faces.push((card, face));
        }
        fn set_moves(&mut self, moves: u32) {
            self.moves = moves;
        }
        fn set_stars(&mut self, stars: StarRating) {
            self.stars = Some(stars);
        }
        fn set_time(&mut self, time: &str) {
            self.time = time.to_string();
        }
        fn show_win_panel(&mut self, _moves: u32, _stars: StarRating, _time: &str) {
            self.win_panels += 1;
            self.win_panel_shown = true;
        }
        fn hide_win_panel(&mut self) {
            self.win_panel_shown = false;
        }
        fn play_sound(&mut self, sound: Sound) {
            self.played.push(sound);
        }
        fn stop_sound(&mut self, sound: Sound) {
            self.stopped.push(sound);
        }
        fn set_audio_indicator(&mut self, enabled: bool) {
            self.audio_indicator = Some(enabled);
        }
    }

    fn id(index: usize) -> CardId {
        CardId::new(index).unwrap()
    }

    fn fresh() -> GameController<Recorder, MemoryStorage> {
        GameController::new(Recorder::default(), MemoryStorage::new(), 42)
    }

    /// Card with a different symbol than `card`
    fn non_partner(ctl: &GameController<Recorder, MemoryStorage>, card: CardId) -> CardId {
        let symbol: Symbol = ctl.state().deck.symbol(card);
        CardId::all()
            .find(|c| ctl.state().deck.symbol(*c) != symbol)
            .unwrap()
    }

    #[test]
    fn test_fresh_game_without_save() {
        let ctl = fresh();
        let p = ctl.presenter();
        assert_eq!(p.deals, 1);
        assert_eq!(p.moves, 0);
        assert_eq!(p.stars, Some(StarRating::Three));
        assert_eq!(p.time, "00:00:00");
        assert_eq!(p.played, vec![Sound::Background]);
        assert_eq!(p.audio_indicator, Some(true));
        assert_eq!(ctl.state().moves, 0);
    }

    #[test]
    fn test_match_and_mismatch_flow() {
        let mut ctl = fresh();
        let a = id(0);
        let b = non_partner(&ctl, a);

        assert_eq!(ctl.reveal(a.index()), None);
        let token = ctl.reveal(b.index()).expect("mismatch schedules a rollback");
        assert_eq!(ctl.presenter().face(b), CardFace::Revealed);
        assert_eq!(ctl.presenter().played.last(), Some(&Sound::Mismatch));
        assert_eq!(ctl.presenter().moves, 2);

        // Third card while locked
        let c = ctl.state().deck.partner(a);
        assert_eq!(ctl.reveal(c.index()), None);
        assert_eq!(ctl.presenter().moves, 2);

        ctl.finish_rollback(token);
        assert_eq!(ctl.presenter().face(a), CardFace::Hidden);
        assert_eq!(ctl.presenter().face(b), CardFace::Hidden);

        ctl.reveal(a.index());
        ctl.reveal(c.index());
        assert_eq!(ctl.presenter().face(a), CardFace::Matched);
        assert_eq!(ctl.presenter().face(c), CardFace::Matched);
        assert_eq!(ctl.presenter().played.last(), Some(&Sound::Match));
        assert_eq!(ctl.presenter().moves, 4);
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut ctl = fresh();
        assert_eq!(ctl.reveal(16), None);
        assert_eq!(ctl.reveal(usize::MAX), None);
        assert_eq!(ctl.state().moves, 0);
    }

    #[test]
    fn test_win_flow() {
        let mut ctl = fresh();
        let mut done = Vec::new();
        for card in CardId::all() {
            if done.contains(&card) {
                continue;
            }
            let partner = ctl.state().deck.partner(card);
            ctl.reveal(card.index());
            ctl.tick();
            ctl.reveal(partner.index());
            done.push(card);
            done.push(partner);
        }

        let p = ctl.presenter();
        assert_eq!(p.win_panels, 1);
        assert!(p.win_panel_shown);
        assert_eq!(p.played.last(), Some(&Sound::Win));
        assert!(p.stopped.contains(&Sound::Background));
        assert_eq!(p.time, "00:00:08");

        // Clock is stopped for good
        ctl.begin();
        ctl.tick();
        assert_eq!(ctl.presenter().time, "00:00:08");
        assert_eq!(ctl.presenter().win_panels, 1);
    }

    #[test]
    fn test_restart_invalidates_pending_rollback() {
        let mut ctl = fresh();
        let a = id(0);
        let b = non_partner(&ctl, a);
        ctl.reveal(a.index());
        let token = ctl.reveal(b.index()).unwrap();

        ctl.restart();
        assert_eq!(ctl.presenter().deals, 2);
        assert_eq!(ctl.presenter().moves, 0);
        assert!(!ctl.state().is_locked());

        let first = id(5);
        ctl.reveal(first.index());
        ctl.finish_rollback(token);
        assert!(ctl.state().open_cards.contains(first));
        assert_eq!(ctl.presenter().face(first), CardFace::Revealed);
    }

    #[test]
    fn test_restart_resets_clock_and_panel() {
        let mut ctl = fresh();
        ctl.begin();
        ctl.tick();
        ctl.tick();
        assert_eq!(ctl.presenter().time, "00:00:02");

        ctl.restart();
        assert_eq!(ctl.presenter().time, "00:00:00");
        assert!(!ctl.presenter().win_panel_shown);
        ctl.tick();
        assert_eq!(ctl.state().timer.elapsed_seconds(), 0);
    }

    #[test]
    fn test_save_then_reload() {
        let mut ctl = fresh();
        let a = id(3);
        let partner = ctl.state().deck.partner(a);
        ctl.reveal(a.index());
        ctl.tick();
        ctl.reveal(partner.index());
        let lone = CardId::all()
            .find(|c| !ctl.state().open_cards.contains(*c))
            .unwrap();
        ctl.reveal(lone.index());
        ctl.save().unwrap();

        let deck = ctl.state().deck.clone();
        let open = ctl.state().open_cards.clone();
        let storage = ctl.into_storage();

        let reloaded = GameController::new(Recorder::default(), storage, 7);
        assert_eq!(reloaded.state().deck, deck);
        assert_eq!(reloaded.state().open_cards, open);
        assert_eq!(reloaded.state().moves, 3);
        let p = reloaded.presenter();
        assert_eq!(p.moves, 3);
        assert_eq!(p.time, "00:00:01");
        assert_eq!(p.face(a), CardFace::Matched);
        assert_eq!(p.face(partner), CardFace::Matched);
        assert_eq!(p.face(lone), CardFace::Revealed);
        assert!(!reloaded.state().timer.is_running());
    }

    #[test]
    fn test_corrupt_save_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.set_item(SAVE_KEY, r#"{"moves": "lots"}"#).unwrap();
        let ctl = GameController::new(Recorder::default(), storage, 1);
        assert_eq!(ctl.state().moves, 0);
        assert!(ctl.state().open_cards.is_empty());
    }

    #[test]
    fn test_restored_won_game_shows_result() {
        let deck = Deck::ordered();
        let mut state = GameState::new(deck, 0);
        for n in 0..8 {
            sim::reveal(&mut state, id(n));
            sim::reveal(&mut state, id(n + 8));
        }
        let mut storage = MemoryStorage::new();
        persistence::save(&mut storage, SAVE_KEY, &SavedGame::capture(&state)).unwrap();

        let mut ctl = GameController::new(Recorder::default(), storage, 1);
        assert!(ctl.state().is_won());
        assert_eq!(ctl.presenter().win_panels, 1);
        assert_eq!(ctl.presenter().played, vec![Sound::Win]);

        ctl.begin();
        assert!(!ctl.state().timer.is_running());
    }

    #[test]
    fn test_mute_suppresses_sounds_and_persists() {
        let mut ctl = fresh();
        ctl.toggle_audio();
        assert_eq!(ctl.presenter().audio_indicator, Some(false));
        assert_eq!(ctl.presenter().stopped.last(), Some(&Sound::Background));

        let played_before = ctl.presenter().played.len();
        let a = id(0);
        let b = non_partner(&ctl, a);
        ctl.reveal(a.index());
        ctl.reveal(b.index());
        assert_eq!(ctl.presenter().played.len(), played_before);
        assert_eq!(ctl.state().moves, 2);

        let storage = ctl.into_storage();
        assert!(storage.get_item(SETTINGS_KEY).unwrap().is_some());
        let reloaded = GameController::new(Recorder::default(), storage, 1);
        assert!(!reloaded.settings().audio_enabled);
        assert!(reloaded.presenter().played.is_empty());
    }

    #[test]
    fn test_unmute_plays_background() {
        let mut ctl = fresh();
        ctl.toggle_audio();
        ctl.toggle_audio();
        assert_eq!(ctl.presenter().audio_indicator, Some(true));
        assert_eq!(ctl.presenter().played.last(), Some(&Sound::Background));
    }
}
