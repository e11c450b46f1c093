//! DOM presenter
//!
//! Expects the page markup: `.deck` (card list), `.moves`, `.stars`,
//! `.time-lapse`, `.sound-control`, `.restart` and a `.container` to hold the
//! result panel.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{Presenter, Sound};
use crate::Settings;
use crate::audio::AudioManager;
use crate::sim::{CardFace, CardId, Deck, StarRating};

const STAR: &str = r#"<li><i class="fa fa-star"></i></li>"#;

pub struct DomPresenter {
    document: Document,
    audio: AudioManager,
}

impl DomPresenter {
    pub fn new(document: Document, settings: &Settings) -> Self {
        Self {
            document,
            audio: AudioManager::new(settings),
        }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn set_text(&self, selector: &str, text: &str) {
        if let Some(el) = self.query(selector) {
            el.set_text_content(Some(text));
        }
    }

    fn card(&self, card: CardId) -> Option<Element> {
        self.document.get_element_by_id(&card.dom_id())
    }

    /// Whether the result panel is on screen
    pub fn is_win_panel_shown(&self) -> bool {
        self.query(".result-panel").is_some()
    }
}

/// Card index of the focused card, if focus is on the board
pub fn focused_card(document: &Document) -> Option<usize> {
    let el = document.query_selector(".deck .card:focus").ok().flatten()?;
    CardId::parse(&el.id()).map(CardId::index)
}

/// Move keyboard focus to a card
pub fn focus_card(document: &Document, index: usize) {
    let Some(card) = CardId::new(index) else {
        return;
    };
    if let Some(el) = document
        .get_element_by_id(&card.dom_id())
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = el.focus();
    }
}

fn stars_html(stars: StarRating) -> String {
    STAR.repeat(stars.count() as usize)
}

impl Presenter for DomPresenter {
    fn render_deck(&mut self, deck: &Deck) {
        let Some(board) = self.query(".deck") else {
            log::error!("No .deck element on the page");
            return;
        };
        board.set_inner_html("");

        for card in deck.cards() {
            let Ok(li) = self.document.create_element("li") else {
                continue;
            };
            li.set_class_name("card flex flex-center cursor-pointer");
            let _ = li.set_attribute("data-symbol", card.symbol.as_str());
            li.set_id(&card.id.dom_id());
            let _ = li.set_attribute("tabindex", "0");
            li.set_inner_html(&format!("<i class='fa fa-{}'></i>", card.symbol.as_str()));
            let _ = board.append_child(&li);
        }
    }

    fn set_card_face(&mut self, card: CardId, face: CardFace) {
        let Some(el) = self.card(card) else {
            return;
        };
        let classes = el.class_list();
        let _ = match face {
            CardFace::Hidden => classes.remove_2("open", "match"),
            CardFace::Revealed => classes.add_1("open"),
            CardFace::Matched => classes
                .remove_1("open")
                .and_then(|_| classes.add_1("match")),
        };
    }

    fn set_moves(&mut self, moves: u32) {
        self.set_text(".moves", &moves.to_string());
    }

    fn set_stars(&mut self, stars: StarRating) {
        if let Some(el) = self.query(".stars") {
            el.set_inner_html(&stars_html(stars));
        }
    }

    fn set_time(&mut self, time: &str) {
        self.set_text(".time-lapse", time);
    }

    fn show_win_panel(&mut self, moves: u32, stars: StarRating, time: &str) {
        if self.is_win_panel_shown() {
            return;
        }
        let Some(container) = self.query(".container") else {
            return;
        };
        let Ok(section) = self.document.create_element("section") else {
            return;
        };
        section.set_class_name("result-panel");
        section.set_inner_html(&format!(
            concat!(
                r#"<div class="result-message">You Win!</div>"#,
                r#"<div><span class="result-label">Moves: </span>{}<ul class="stars">{}</ul></div>"#,
                r#"<div class="result-time-lapse"><span class="result-label">Time: </span>{}</div>"#,
                r#"<div class="restart cursor-pointer result-restart" tabindex="0"><i class="fa fa-repeat"></i>Restart</div>"#,
            ),
            moves,
            stars_html(stars),
            time
        ));
        let _ = container.append_child(&section);
    }

    fn hide_win_panel(&mut self) {
        if let Some(panel) = self.query(".result-panel") {
            panel.remove();
        }
    }

    fn play_sound(&mut self, sound: Sound) {
        self.audio.play(sound);
    }

    fn stop_sound(&mut self, sound: Sound) {
        self.audio.stop(sound);
    }

    fn set_audio_indicator(&mut self, enabled: bool) {
        if let Some(el) = self.query(".sound-control") {
            let icon = if enabled { "fa-volume-up" } else { "fa-volume-off" };
            el.set_inner_html(&format!(r#"<i class="fa {}"></i>"#, icon));
        }
    }
}
