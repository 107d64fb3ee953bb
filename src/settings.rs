//! Player preferences
//!
//! Persisted in LocalStorage. Game progress is never saved; only these
//! display preferences survive a reload.

use serde::{Deserialize, Serialize};

use crate::rain::{DEFAULT_FONT_SIZE, RainIntensity};
use crate::sim::CityState;

/// Rain quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the settings bar cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Rain glyph size (bigger glyphs = fewer columns)
    pub fn rain_font_size(&self) -> f32 {
        match self {
            QualityPreset::Low => 22.0,
            QualityPreset::Medium => DEFAULT_FONT_SIZE,
            QualityPreset::High => 12.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rain quality preset
    pub quality: QualityPreset,
    /// Draw the rain background
    pub rain: bool,
    /// Keep the rain calm regardless of city state
    pub reduced_motion: bool,
    /// Show the telemetry rows in the city status panel
    pub show_telemetry: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            rain: true,
            reduced_motion: false,
            show_telemetry: true,
        }
    }
}

impl Settings {
    /// Rain intensity to use for the city (respects reduced_motion)
    pub fn rain_intensity(&self, city: CityState) -> RainIntensity {
        if self.reduced_motion {
            RainIntensity::Low
        } else {
            RainIntensity::for_city(city)
        }
    }

    /// Parse stored JSON, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "courier_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
