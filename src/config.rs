// SPDX-License-Identifier: GPL-3.0-only

//! Persistent application configuration
//!
//! Stored as JSON under the platform config directory
//! (`~/.config/viewfinder/config.json` on Linux). Loading is tolerant:
//! a missing or malformed file falls back to defaults so the camera always
//! starts.

use crate::backends::camera::types::{Facing, FlashMode};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Output format for photo captures
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoOutputFormat {
    /// JPEG (lossy, small files)
    #[default]
    Jpeg,
    /// PNG (lossless)
    Png,
}

/// Encoding quality preset for photo captures
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoQuality {
    Low,
    Medium,
    #[default]
    High,
    Maximum,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Camera facing selected on launch
    pub default_facing: Facing,
    /// Flash mode restored on launch
    pub flash: FlashMode,
    /// Output format for photo captures
    pub photo_format: PhotoOutputFormat,
    /// Encoding quality for photo captures
    pub photo_quality: PhotoQuality,
    /// Override for the photo save directory (None = `$XDG_PICTURES_DIR/Camera`)
    pub photo_dir: Option<PathBuf>,
    /// Override for the video save directory (None = `$XDG_VIDEOS_DIR/Camera`)
    pub video_dir: Option<PathBuf>,
    /// Mirror the preview horizontally for the front camera (selfie mode)
    pub mirror_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_facing: Facing::default(), // Back camera on launch
            flash: FlashMode::default(),       // Flash off
            photo_format: PhotoOutputFormat::default(),
            photo_quality: PhotoQuality::default(),
            photo_dir: None,
            video_dir: None,
            mirror_preview: true, // Default to mirrored (selfie mode)
        }
    }
}

/// Path of the config file, if a config directory exists on this platform
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("viewfinder").join("config.json"))
}

impl Config {
    /// Load the configuration from the platform config directory
    ///
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load the configuration from a specific file
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Config file is malformed, using defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Persist the configuration to the platform config directory
    pub fn save(&self) -> AppResult<()> {
        let path = config_path()
            .ok_or_else(|| AppError::Config("no config directory available".to_string()))?;
        self.save_to(&path)
    }

    /// Persist the configuration to a specific file
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("failed to create config directory: {}", e)))?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, raw)
            .map_err(|e| AppError::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Photo save directory, honoring the configured override
    pub fn resolved_photo_dir(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(crate::storage::default_photo_dir)
    }

    /// Video save directory, honoring the configured override
    pub fn resolved_video_dir(&self) -> PathBuf {
        self.video_dir
            .clone()
            .unwrap_or_else(crate::storage::default_video_dir)
    }
}
