//! Player preferences
//!
//! Persisted separately from the game snapshot so that restarting or losing
//! a save never resets them.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::platform::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound control state; off means no music and no effects
    pub audio_enabled: bool,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f64,
    /// Match/mismatch/win cue volume (0.0 - 1.0)
    pub sfx_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            music_volume: 0.1,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Flip the sound control. Returns the new state.
    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        self.audio_enabled
    }

    /// Volumes clamped to the valid range
    pub fn sanitized(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings, falling back to defaults
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match storage.get_item(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        let result = serde_json::to_string(self)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                storage
                    .set_item(SETTINGS_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_defaults_when_absent_or_corrupt() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());

        storage.set_item(SETTINGS_KEY, "{oops").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        assert!(!settings.toggle_audio());
        settings.save(&mut storage);

        let loaded = Settings::load(&storage);
        assert!(!loaded.audio_enabled);
        assert_eq!(loaded.music_volume, 0.1);
    }

    #[test]
    fn test_partial_and_out_of_range_values() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(SETTINGS_KEY, r#"{"music_volume": 4.0}"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert!(loaded.audio_enabled);
        assert_eq!(loaded.music_volume, 1.0);
        assert_eq!(loaded.sfx_volume, 1.0);
    }
}
