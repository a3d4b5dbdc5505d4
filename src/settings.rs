//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web; read from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest nickname accepted for score submission
pub const MAX_NICKNAME_LEN: usize = 16;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name attached to submitted scores
    pub nickname: String,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Input ===
    /// Multiplier on relative (touch) drag distance
    pub touch_sensitivity: f32,

    // === Visual ===
    /// Draw snake trails
    pub trails: bool,
    /// Show the stage label in the HUD
    pub show_stage: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nickname: "anonymous".to_string(),
            seed: None,
            touch_sensitivity: 1.0,
            trails: true,
            show_stage: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.nickname = settings.nickname.trim().to_string();
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.touch_sensitivity.is_finite() || self.touch_sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity {
                value: self.touch_sensitivity,
            });
        }
        if self.nickname.trim().is_empty() {
            return Err(ConfigError::EmptyNickname);
        }
        let len = self.nickname.chars().count();
        if len > MAX_NICKNAME_LEN {
            return Err(ConfigError::NicknameTooLong {
                len,
                max: MAX_NICKNAME_LEN,
            });
        }
        Ok(())
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "survival_dodge_settings";

    /// Environment variable naming the native settings file
    pub const PATH_ENV: &'static str = "SURVIVAL_DODGE_SETTINGS";

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
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(err) => log::warn!("Settings not saved: {err}"),
            }
        }
    }

    /// Load settings from `$SURVIVAL_DODGE_SETTINGS` or `settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = std::env::var_os(Self::PATH_ENV)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from("settings.json"));

        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {err}", path.display());
                Self::default()
            }
        }
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
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "nickname": "  dodger  " }"#).expect("valid settings");
        assert_eq!(settings.nickname, "dodger");
        assert_eq!(settings.touch_sensitivity, 1.0);
        assert!(settings.trails);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_rejects_bad_sensitivity() {
        let err = Settings::from_json(r#"{ "touch_sensitivity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSensitivity { .. }));
    }

    #[test]
    fn test_rejects_long_nickname() {
        let err = Settings::from_json(r#"{ "nickname": "abcdefghijklmnopqrstuvwxyz" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NicknameTooLong { len: 26, max: MAX_NICKNAME_LEN }));
    }

    #[test]
    fn test_rejects_blank_nickname() {
        let err = Settings::from_json(r#"{ "nickname": "   " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNickname));
        assert!(Settings::from_json(r#"{ "nickname": "" }"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ nickname").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("malformed settings"));
    }

    #[test]
    fn test_json_roundtrip_keeps_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }
}
