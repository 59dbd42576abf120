//! Application configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tiling_core::Layout;
use tracing::{debug, info, instrument};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tiling_puzzle.toml";

/// Runtime configuration for the game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned for 400×400 puzzle PNGs.
    #[serde(default = "default_puzzles_dir")]
    puzzles_dir: PathBuf,

    /// Image drawn over the selected tile.
    #[serde(default = "default_selected_overlay")]
    selected_overlay: PathBuf,

    /// Banner drawn once a puzzle is solved.
    #[serde(default = "default_solved_banner")]
    solved_banner: PathBuf,

    /// Frame rate cap.
    #[serde(default = "default_fps")]
    fps: u32,

    /// Canvas pixels per terminal column; each row covers twice as many.
    #[serde(default = "default_pixels_per_cell")]
    pixels_per_cell: u32,

    /// Board geometry.
    #[serde(default)]
    layout: Layout,
}

#[instrument]
fn default_puzzles_dir() -> PathBuf {
    PathBuf::from("puzzles")
}

#[instrument]
fn default_selected_overlay() -> PathBuf {
    PathBuf::from("textures/selectedOverlay.png")
}

#[instrument]
fn default_solved_banner() -> PathBuf {
    PathBuf::from("textures/puzzle-complete-txt.png")
}

#[instrument]
fn default_fps() -> u32 {
    60
}

#[instrument]
fn default_pixels_per_cell() -> u32 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            puzzles_dir: default_puzzles_dir(),
            selected_overlay: default_selected_overlay(),
            solved_banner: default_solved_banner(),
            fps: default_fps(),
            pixels_per_cell: default_pixels_per_cell(),
            layout: Layout::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(puzzles_dir = %config.puzzles_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if present, else defaults.
    #[instrument]
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Rejects settings the frame loop cannot run with.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::new("fps must be at least 1".to_string()));
        }
        if self.pixels_per_cell == 0 {
            return Err(ConfigError::new(
                "pixels_per_cell must be at least 1".to_string(),
            ));
        }
        self.layout
            .validate()
            .map_err(|e| ConfigError::new(e.message))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
