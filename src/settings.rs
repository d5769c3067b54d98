//! Player preferences
//!
//! Persisted separately from gameplay in LocalStorage. Anything unreadable
//! is treated as "no saved preference".

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sim::Difficulty;

/// Saved preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Last difficulty picked on the start screen
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "color_dash_settings";

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::PersistenceUnavailable(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::PersistenceUnavailable(e.to_string()))
    }

    /// Parse stored text, falling back to defaults
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored.map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring saved settings: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, using default settings");
            return Self::default();
        };
        let stored = storage.get_item(Self::STORAGE_KEY).ok().flatten();
        let settings = Self::from_stored(stored.as_deref());
        log::info!("Loaded settings (difficulty: {})", settings.difficulty.as_str());
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), CoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| CoreError::PersistenceUnavailable("no LocalStorage".into()))?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| CoreError::PersistenceUnavailable(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), CoreError> {
        // No-op for native
        Ok(())
    }
}
