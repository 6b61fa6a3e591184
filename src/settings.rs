//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web build. Only presentation is affected;
//! the simulation never reads these.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Digits used to display the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumeralSystem {
    #[default]
    Khmer,
    Latin,
}

impl NumeralSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumeralSystem::Khmer => "Khmer",
            NumeralSystem::Latin => "Latin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "khmer" | "km" => Some(NumeralSystem::Khmer),
            "latin" | "arabic" | "en" => Some(NumeralSystem::Latin),
            _ => None,
        }
    }

    /// The ten digit glyphs, zero first
    pub fn digits(&self) -> [char; 10] {
        match self {
            NumeralSystem::Khmer => ['០', '១', '២', '៣', '៤', '៥', '៦', '៧', '៨', '៩'],
            NumeralSystem::Latin => ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Score numerals and label language
    pub numerals: NumeralSystem,

    // === Visual Effects ===
    /// Re-randomize the pipe colour every frame
    pub pipe_color_flicker: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no colour flicker)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            numerals: NumeralSystem::Khmer,
            pipe_color_flicker: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective pipe flicker (respects reduced_motion)
    pub fn effective_pipe_flicker(&self) -> bool {
        self.pipe_color_flicker && !self.reduced_motion
    }

    /// Parse settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gate_flap_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeral_parse() {
        assert_eq!(NumeralSystem::parse("KHMER"), Some(NumeralSystem::Khmer));
        assert_eq!(NumeralSystem::parse("latin"), Some(NumeralSystem::Latin));
        assert_eq!(NumeralSystem::parse("roman"), None);
    }

    #[test]
    fn test_reduced_motion_disables_flicker() {
        let mut settings = Settings::default();
        assert!(settings.effective_pipe_flicker());
        settings.reduced_motion = true;
        assert!(!settings.effective_pipe_flicker());
    }

    #[test]
    fn test_json_roundtrip_with_defaults() {
        let settings = Settings::from_json(r#"{ "numerals": "Latin" }"#).unwrap();
        assert_eq!(settings.numerals, NumeralSystem::Latin);
        assert!(settings.pipe_color_flicker);

        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
