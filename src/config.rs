//! Configuration management for tactile-quiz
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    APP_DIR_NAME, CONFIG_GENERATED, DEFAULT_DEBOUNCE_MS, DEFAULT_DEVICE_NAME, DEFAULT_DOUBLE_PRESS_WINDOW_MS,
    DEFAULT_MIN_POSE_CONTENT_LEN, DEFAULT_PLAYBACK_RATES,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub quiz: QuizConfig,
    pub input: InputConfig,
    pub speech: SpeechConfig,
    pub device: DeviceConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Question generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Pose frames at or below this length are treated as placeholders
    pub min_pose_content_len: usize,
}

/// Key input timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Duplicate key codes inside this window are dropped
    pub debounce_ms: u64,
    /// A second F4 press inside this window cycles the playback rate
    pub double_press_window_ms: u64,
}

/// Speech output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Send feedback text to the speech engine
    pub enabled: bool,
    /// Playback rates cycled by a double press, in order
    pub playback_rates: Vec<f32>,
}

/// Device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name requested when pairing
    pub name: String,
    /// Connect as soon as the runtime starts
    pub auto_connect: bool,
}

/// Catalog location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the JSON catalog file
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to a file in the data directory
    pub enabled: bool,
    /// Minimum level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_pose_content_len: DEFAULT_MIN_POSE_CONTENT_LEN,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            double_press_window_ms: DEFAULT_DOUBLE_PRESS_WINDOW_MS,
        }
    }
}

impl InputConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn double_press_window(&self) -> Duration {
        Duration::from_millis(self.double_press_window_ms)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            playback_rates: DEFAULT_PLAYBACK_RATES.to_vec(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            auto_connect: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level into a `log` filter
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid logging level '{}'", self.level))
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("tactile-quiz.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.quiz.min_pose_content_len == 0 {
            anyhow::bail!("min_pose_content_len must be at least 1");
        }

        if self.input.debounce_ms == 0 || self.input.double_press_window_ms == 0 {
            anyhow::bail!("debounce_ms and double_press_window_ms must be greater than 0");
        }

        // A second press must be able to pass the debounce filter
        if self.input.debounce_ms >= self.input.double_press_window_ms {
            anyhow::bail!(
                "debounce_ms ({}) must be shorter than double_press_window_ms ({})",
                self.input.debounce_ms,
                self.input.double_press_window_ms
            );
        }

        self.validate_rates()?;
        self.logging.level_filter()?;

        if self.device.name.is_empty() {
            anyhow::bail!("device name cannot be empty");
        }

        Ok(())
    }

    fn validate_rates(&self) -> Result<()> {
        let rates = &self.speech.playback_rates;
        if rates.is_empty() {
            anyhow::bail!("playback_rates cannot be empty");
        }
        if rates.iter().any(|rate| !rate.is_finite() || *rate <= 0.0) {
            anyhow::bail!("playback_rates must all be positive, got {:?}", rates);
        }
        if rates.windows(2).any(|pair| pair[0] >= pair[1]) {
            anyhow::bail!("playback_rates must be strictly ascending, got {:?}", rates);
        }
        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# tactile-quiz Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
