//! Player preferences
//!
//! Read as JSON from LocalStorage. None of these touch gameplay.

use serde::{Deserialize, Serialize};

use crate::audio::MusicStyle;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything (the beat clock keeps running)
    pub muted: bool,
    /// Mute when the page loses focus
    pub mute_on_blur: bool,
    /// Music loop synthesized at startup
    pub music_style: MusicStyle,

    // === Visual Effects ===
    /// Player motion trail
    pub trails: bool,
    /// Scrolling background decorations
    pub background_effects: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// No beat-driven color flashes
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            mute_on_blur: true,
            music_style: MusicStyle::Classic,

            trails: true,
            background_effects: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    fn audible(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * channel).clamp(0.0, 1.0)
        }
    }

    /// Multiplier for one-shot effects
    pub fn effective_sfx_volume(&self) -> f32 {
        self.audible(self.sfx_volume)
    }

    /// Multiplier for the music loop
    pub fn effective_music_volume(&self) -> f32 {
        self.audible(self.music_volume)
    }

    /// Whether beats may re-theme colors
    pub fn beat_flashes(&self) -> bool {
        !self.reduced_motion
    }

    /// Clamp volumes into range after external edits
    pub fn sanitize(&mut self) {
        for volume in [
            &mut self.master_volume,
            &mut self.sfx_volume,
            &mut self.music_volume,
        ] {
            *volume = if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                1.0
            };
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "cube_runner_settings";

    fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(mut settings) => {
                settings.sanitize();
                Some(settings)
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
