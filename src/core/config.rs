use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::gesture::MAX_CONFIDENCE;

/// What the overlay does when a tick sees no hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoHandPolicy {
    /// Keep showing the last gesture (no flicker between frames)
    Retain,
    /// Hide the gesture as soon as the hand disappears
    Clear,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Sampling loop period in milliseconds
    pub tick_period_ms: u64,
    /// Minimum confidence (0.0-10.0) for a gesture to be shown
    pub confidence_floor: f32,
    /// Behaviour of the displayed gesture while no hand is visible
    pub no_hand_policy: NoHandPolicy,
    /// A pose estimate taking longer than this counts as "no hand"
    pub estimate_timeout_ms: u64,
    /// Directory holding the per-gesture overlay icons
    pub icon_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            confidence_floor: 7.0,
            no_hand_policy: NoHandPolicy::Retain,
            estimate_timeout_ms: 1000,
            icon_dir: PathBuf::from("images"),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.tick_period_ms == 0 || self.tick_period_ms > 1000 {
            return Err(format!(
                "Invalid tick period: {}ms. Must be between 1 and 1000",
                self.tick_period_ms
            )
            .into());
        }

        if !(0.0..=MAX_CONFIDENCE).contains(&self.confidence_floor) {
            return Err(format!(
                "Invalid confidence floor: {}. Must be between 0.0 and {}",
                self.confidence_floor, MAX_CONFIDENCE
            )
            .into());
        }

        if self.estimate_timeout_ms == 0 || self.estimate_timeout_ms > 60_000 {
            return Err(format!(
                "Invalid estimate timeout: {}ms. Must be between 1 and 60000",
                self.estimate_timeout_ms
            )
            .into());
        }

        if self.icon_dir.as_os_str().is_empty() {
            return Err("Icon directory cannot be empty".into());
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn estimate_timeout(&self) -> Duration {
        Duration::from_millis(self.estimate_timeout_ms)
    }

    /// Get the configuration file path
    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".gesture_overlay");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
