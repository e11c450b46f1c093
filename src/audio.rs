//! Audio playback using HTML audio elements
//!
//! Playback failures (autoplay policy, missing files) are logged and
//! otherwise ignored: the game carries on silently.

use std::collections::HashMap;

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::Settings;
use crate::ui::Sound;

impl Sound {
    /// Audio file for this cue
    pub fn source(&self) -> &'static str {
        match self {
            Sound::Match => "sound/win.mp3",
            Sound::Mismatch => "sound/lose.mp3",
            Sound::Win => "sound/cheering.mp3",
            Sound::Background => "sound/KennyG-ForeverInLove-64.mp3",
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    tracks: HashMap<Sound, HtmlAudioElement>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let mut tracks = HashMap::new();
        for sound in [Sound::Match, Sound::Mismatch, Sound::Win, Sound::Background] {
            match HtmlAudioElement::new_with_src(sound.source()) {
                Ok(element) => {
                    if sound == Sound::Background {
                        element.set_loop(true);
                        element.set_volume(settings.music_volume);
                    } else {
                        element.set_volume(settings.sfx_volume);
                    }
                    tracks.insert(sound, element);
                }
                Err(e) => log::warn!("Failed to create audio for {:?}: {:?}", sound, e),
            }
        }
        Self { tracks }
    }

    /// Play a cue. Background music always starts from the beginning.
    pub fn play(&self, sound: Sound) {
        let Some(track) = self.tracks.get(&sound) else {
            return;
        };
        if sound == Sound::Background {
            track.set_current_time(0.0);
        }

        match track.play() {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Audio {:?} failed to play: {:?}", sound, e);
                    }
                });
            }
            Err(e) => log::warn!("Audio {:?} failed to play: {:?}", sound, e),
        }
    }

    pub fn stop(&self, sound: Sound) {
        if let Some(track) = self.tracks.get(&sound) {
            if let Err(e) = track.pause() {
                log::warn!("Audio {:?} failed to pause: {:?}", sound, e);
            }
        }
    }
}
