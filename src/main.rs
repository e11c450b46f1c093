//! Matching Game entry point
//!
//! Handles platform-specific initialization and wires input to the game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent};

    use matching_game::consts::*;
    use matching_game::platform::LocalStorage;
    use matching_game::sim::RollbackToken;
    use matching_game::ui::dom::{self, DomPresenter};
    use matching_game::ui::keyboard::{KeyAction, columns_for_width, navigate};
    use matching_game::{GameController, Settings};

    type Game = GameController<DomPresenter, LocalStorage>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Matching Game starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let storage = LocalStorage::new();
        let settings = Settings::load(&storage);
        let presenter = DomPresenter::new(document.clone(), &settings);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(GameController::new(presenter, storage, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_card_clicks(game.clone());
        setup_keyboard(game.clone());
        setup_restart_buttons(game.clone());
        setup_sound_control(game.clone());
        setup_save_on_exit(game.clone());
        start_clock(game);

        log::info!("Matching Game running!");
    }

    /// Hide the mismatched pair after the delay
    fn schedule_rollback(game: Rc<RefCell<Game>>, token: RollbackToken) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move || {
            game.borrow_mut().finish_rollback(token);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            MISMATCH_DELAY_MS,
        );
        closure.forget();
    }

    fn reveal(game: &Rc<RefCell<Game>>, index: usize) {
        let token = game.borrow_mut().reveal(index);
        if let Some(token) = token {
            schedule_rollback(game.clone(), token);
        }
    }

    fn setup_card_clicks(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(board) = document.query_selector(".deck").ok().flatten() else {
            log::error!("No .deck element on the page");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok());
            if let Some(card) = target.filter(|el| el.node_name() == "LI") {
                if let Some(id) = matching_game::sim::CardId::parse(&card.id()) {
                    reveal(&game, id.index());
                }
            }
            event.stop_propagation();
        });
        let _ = board.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(action) = KeyAction::from_key(&event.key()) else {
                return;
            };
            let Some(document) = window_clone.document() else {
                return;
            };

            match action {
                KeyAction::Begin => game.borrow_mut().begin(),
                KeyAction::Move(direction) => {
                    if let Some(current) = dom::focused_card(&document) {
                        let width = window_clone
                            .inner_width()
                            .ok()
                            .and_then(|w| w.as_f64())
                            .unwrap_or(MEDIUM_VIEWPORT);
                        let columns = columns_for_width(width);
                        dom::focus_card(&document, navigate(current, direction, columns));
                        event.prevent_default();
                    }
                }
                KeyAction::Activate => {
                    let won = game.borrow().presenter().is_win_panel_shown();
                    if won {
                        game.borrow_mut().restart();
                    } else if let Some(current) = dom::focused_card(&document) {
                        reveal(&game, current);
                    }
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Restart on the score panel
        if let Some(btn) = document.query_selector(".score-panel .restart").ok().flatten() {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart on the result panel, which comes and goes
        if let Some(container) = document.query_selector(".container").ok().flatten() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let hit = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(".result-restart").ok().flatten());
                if hit.is_some() {
                    game.borrow_mut().restart();
                }
            });
            let _ = container
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_sound_control(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(control) = document.query_selector(".sound-control").ok().flatten() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().toggle_audio();
                event.stop_propagation();
            });
            let _ = control.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() != "Enter" {
                    return;
                }
                game.borrow_mut().toggle_audio();
                event.stop_propagation();
            });
            let _ = control.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_save_on_exit(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Err(e) = game.borrow_mut().save() {
                log::warn!("Could not save game: {}", e);
            }
        });
        let _ = window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One tick per second; the game ignores ticks while its clock is idle
    fn start_clock(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().tick();
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_INTERVAL_MS,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Matching Game (native) starting...");
    log::info!("Native mode plays a scripted game - run with `trunk serve` for the web version");

    play_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a full game with one deliberate mismatch, saving and restoring halfway
#[cfg(not(target_arch = "wasm32"))]
fn play_demo() {
    use matching_game::GameController;
    use matching_game::platform::MemoryStorage;
    use matching_game::sim::CardId;
    use matching_game::ui::LogPresenter;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = GameController::new(LogPresenter::new(4), MemoryStorage::new(), seed);

    let first = CardId::new(0).expect("card 0 is on the board");
    let partner = game.state().deck.partner(first);
    let wrong = CardId::all()
        .find(|c| *c != first && *c != partner)
        .expect("board has more than one pair");

    game.reveal(first.index());
    game.tick();
    if let Some(token) = game.reveal(wrong.index()) {
        println!("{}\n", game.presenter().board());
        game.finish_rollback(token);
    }
    game.reveal(first.index());
    game.tick();
    game.reveal(partner.index());
    println!("{}\n", game.presenter().board());

    if let Err(e) = game.save() {
        log::warn!("Could not save game: {}", e);
    }
    let storage = game.into_storage();
    let mut game = GameController::new(LogPresenter::new(4), storage, seed);
    println!("Restored:\n{}\n", game.presenter().board());

    for card in CardId::all() {
        if game.state().open_cards.contains(card) {
            continue;
        }
        let partner = game.state().deck.partner(card);
        game.reveal(card.index());
        game.tick();
        game.reveal(partner.index());
    }
    println!("{}", game.presenter().board());

    let stats = game.state().stats();
    println!(
        "\n✓ Won in {} moves with {} stars",
        stats.moves,
        stats.stars().count()
    );
}
