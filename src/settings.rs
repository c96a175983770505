//! Game settings and preferences
//!
//! Persisted separately from the leaderboard in LocalStorage. The native
//! build has no storage; it takes difficulty and language from the
//! environment.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::language::Language;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spawn cadence and speed profile for new sessions
    pub difficulty: Difficulty,
    /// Label language
    pub language: Language,

    // === Audio ===
    /// Background loop volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            language: Language::Ko,
            music_volume: 0.5,
            sfx_volume: 0.7,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "avoid_boxes_settings";

    /// Environment variable read by the native build
    pub const DIFFICULTY_ENV: &'static str = "AVOID_BOXES_DIFFICULTY";
    pub const LANGUAGE_ENV: &'static str = "AVOID_BOXES_LANGUAGE";

    /// Parse stored settings; anything unreadable falls back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("Ignoring stored settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Clamp volumes into range
    pub fn sanitized(mut self) -> Self {
        self.music_volume = sanitize_volume(self.music_volume);
        self.sfx_volume = sanitize_volume(self.sfx_volume);
        self
    }

    /// Slider position (0 - 100) for a volume
    pub fn percent(volume: f32) -> u32 {
        (sanitize_volume(volume) * 100.0).round() as u32
    }

    /// Volume from a slider value; `None` if it is not a number
    pub fn volume_from_percent(value: &str) -> Option<f32> {
        let percent: f32 = value.trim().parse().ok()?;
        Some(sanitize_volume(percent / 100.0))
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(json) = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &self.to_json()).is_ok() {
                log::info!("Settings saved");
            } else {
                log::warn!("LocalStorage rejected settings");
            }
        }
    }

    /// Defaults, with difficulty and language taken from
    /// `AVOID_BOXES_DIFFICULTY` and `AVOID_BOXES_LANGUAGE`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let difficulty = std::env::var(Self::DIFFICULTY_ENV)
            .map(|value| Difficulty::from_str_or_default(&value))
            .unwrap_or_default();
        let language = std::env::var(Self::LANGUAGE_ENV)
            .map(|value| Language::from_str_or_default(&value))
            .unwrap_or_default();
        Self {
            difficulty,
            language,
            ..Self::default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
