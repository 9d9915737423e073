use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::PlaybackMode;

/// Player configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Startup volume, 0 to 100
    pub default_volume: u8,
    pub playback_mode: PlaybackMode,
    /// Where relative playlist names are looked up and saved
    pub playlist_directory: PathBuf,
    /// Expand `.m3u` files into their entries when adding tracks
    pub expand_m3u: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 80,
            playback_mode: PlaybackMode::Sequential,
            playlist_directory: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            expand_m3u: true,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config: PlayerConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load from the default location, falling back to defaults if the file is unreadable
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;
        let config = Self::load_config(&config_path).unwrap_or_else(|e| {
            warn!("Ignoring configuration at {}: {}", config_path.display(), e);
            PlayerConfig::default()
        });

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load from an explicit file; a malformed file is an error
    pub fn with_path(config_path: PathBuf) -> Result<Self, ConfigError> {
        let config = Self::load_config(&config_path)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn update_config<F>(&mut self, updater: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut PlayerConfig),
    {
        updater(&mut self.config);
        self.config.default_volume = self.config.default_volume.min(100);
        self.save_config()
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::home_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join(".config")
            .join("spf-player");

        std::fs::create_dir_all(&config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    fn load_config(path: &Path) -> Result<PlayerConfig, ConfigError> {
        if !path.exists() {
            return Ok(PlayerConfig::default());
        }

        let config_content = std::fs::read_to_string(path)?;
        let mut config: PlayerConfig = toml::from_str(&config_content)?;
        config.default_volume = config.default_volume.min(100);

        Ok(config)
    }

    fn save_config(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let config_content = toml::to_string_pretty(&self.config)?;
        std::fs::write(&self.config_path, config_content)?;

        Ok(())
    }
}
