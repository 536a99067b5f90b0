//! Game settings and preferences
//!
//! Saved through `storage`. Natively the JSON file named by
//! `SNAKE_RUSH_SETTINGS` overrides the saved copy.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_TICK_MS, SPEED_TICK_MS};
use crate::storage;

const STORAGE_KEY: &str = "snake_rush_settings";

/// Native override: path of a settings JSON file
pub const SETTINGS_ENV: &str = "SNAKE_RUSH_SETTINGS";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Tick interval in milliseconds
    pub tick_ms: u32,
    /// Tick interval while the speed power-up is active
    pub speed_tick_ms: u32,

    // === Rules ===
    /// Wrap at walls and ignore body/obstacle hits
    pub immortal: bool,
    /// Offer the trivia revival on death
    pub trivia_enabled: bool,

    /// Fixed run seed (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: BASE_TICK_MS,
            speed_tick_ms: SPEED_TICK_MS,
            immortal: false,
            trivia_enabled: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Interval for the next tick
    pub fn interval_ms(&self, speed_active: bool) -> u32 {
        if speed_active {
            self.speed_tick_ms.min(self.tick_ms)
        } else {
            self.tick_ms
        }
    }

    /// Parse settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Invalid settings: {}", e);
                None
            }
        }
    }

    /// Load saved settings. Natively a file named by `SNAKE_RUSH_SETTINGS`
    /// takes precedence over the data directory.
    pub fn load() -> Self {
        if let Some(settings) = Self::load_env_file() {
            return settings;
        }
        match storage::load::<Settings>(STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded saved settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_env_file() -> Option<Self> {
        let path = std::env::var_os(SETTINGS_ENV)?;
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json),
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path.to_string_lossy(), e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn load_env_file() -> Option<Self> {
        None
    }
}
