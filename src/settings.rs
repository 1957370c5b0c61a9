//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockdrop/settings.toml (or platform equivalent)

use crate::account::DailyCredits;
use crate::game::DEFAULT_CLEAR_DELAY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub visual: VisualSettings,
    pub gameplay: GameplaySettings,
    pub audio: AudioSettings,
    pub player: PlayerSettings,
    /// Daily play allowance
    pub credits: DailyCredits,
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Show where a dragged shape will land
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Pause before full lines are cleared, in milliseconds
    pub clear_delay_ms: u64,
    /// How many board rows a dragged shape floats above the pointer
    pub drag_lift: u32,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// SFX volume (0-100)
    pub sfx_volume: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Name recorded with submitted scores
    pub name: String,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            clear_delay_ms: DEFAULT_CLEAR_DELAY.as_millis() as u64,
            drag_lift: 2,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { sfx_volume: 50 }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
        }
    }
}

impl GameplaySettings {
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockdrop", "blockdrop").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings, falling back to defaults on a malformed file
    pub fn from_toml(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed settings file: {}", e);
            Self::default()
        })
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), SettingsError> {
        let dir = Self::config_dir().ok_or(SettingsError::NoConfigDir)?;
        let path = dir.join("settings.toml");

        fs::create_dir_all(&dir)?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [gameplay]
            clear_delay_ms = 400

            [credits]
            daily_allowance = 9
            "#,
        );
        assert_eq!(settings.gameplay.clear_delay(), Duration::from_millis(400));
        assert_eq!(settings.gameplay.drag_lift, 2);
        assert_eq!(settings.credits.daily_allowance, 9);
        assert_eq!(settings.credits.remaining, 5);
        assert!(settings.visual.show_ghost);
        assert_eq!(settings.player.name, "Player");
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let settings = Settings::from_toml("gameplay = 3");
        assert_eq!(settings.gameplay.clear_delay_ms, 250);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.visual.block_style = "round".to_string();
        settings.credits.remaining = 1;
        let text = toml::to_string_pretty(&settings).unwrap();
        let back = Settings::from_toml(&text);
        assert_eq!(back.visual.block_chars(), ("()", ".."));
        assert_eq!(back.credits, settings.credits);
    }
}
