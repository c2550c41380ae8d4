//! TOML Configuration File Support
//!
//! Appearance and engine settings live in a TOML file at
//! `~/.config/sidekick/sidekick.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/sidekick/sidekick.toml` (typically `~/.config/sidekick/sidekick.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [appearance]
//! color = "#BAE6FD"   # or a preset: sky, mint, pink, violet, gold, cloud
//! scale = 1.0
//! audio_reactive = false
//!
//! [engine]
//! seed = 42
//! fps = 60
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::appearance::{parse_color_setting, AppearanceConfig, Color, MAX_SCALE, MIN_SCALE};

/// Display refresh rate used when none is configured
pub const DEFAULT_FPS: u32 = 60;

/// Highest accepted refresh rate
pub const MAX_FPS: u32 = 240;

/// Environment variable for the body color
pub const ENV_COLOR: &str = "SIDEKICK_COLOR";
/// Environment variable for the scale factor
pub const ENV_SCALE: &str = "SIDEKICK_SCALE";
/// Environment variable for audio reactivity
pub const ENV_AUDIO_REACTIVE: &str = "SIDEKICK_AUDIO_REACTIVE";
/// Environment variable for the randomness seed
pub const ENV_SEED: &str = "SIDEKICK_SEED";
/// Environment variable for the refresh rate
pub const ENV_FPS: &str = "SIDEKICK_FPS";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Appearance section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceToml {
    /// Hex color or preset name
    pub color: Option<String>,

    /// Uniform scale factor
    pub scale: Option<f32>,

    /// Whether the body pulses with microphone volume
    pub audio_reactive: Option<bool>,
}

/// Engine section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineToml {
    /// Fixed seed for the randomness source
    pub seed: Option<u64>,

    /// Display refresh ticks per second
    pub fps: Option<u32>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SidekickToml {
    /// Appearance section
    pub appearance: AppearanceToml,

    /// Engine section
    pub engine: EngineToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved sidekick configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SidekickConfig {
    /// Initial appearance
    pub appearance: AppearanceConfig,

    /// Fixed seed; `None` uses thread randomness
    pub seed: Option<u64>,

    /// Display refresh ticks per second
    pub fps: u32,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for SidekickConfig {
    fn default() -> Self {
        Self {
            appearance: AppearanceConfig::default(),
            seed: None,
            fps: DEFAULT_FPS,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SidekickConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values that parsing alone cannot reject
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a non-finite or
    /// non-positive scale, or an fps outside `1..=240`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.appearance.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "scale must be a positive number, got {scale}"
            )));
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            tracing::warn!(
                scale,
                min = MIN_SCALE,
                max = MAX_SCALE,
                "Scale outside the usual range"
            );
        }
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::ValidationError(format!(
                "fps must be between 1 and {MAX_FPS}, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/sidekick/sidekick.toml` or
/// `~/.config/sidekick/sidekick.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sidekick").join("sidekick.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// file or environment value is invalid. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<SidekickConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if any value fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SidekickConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration reading environment values through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SidekickConfig, ConfigError> {
    let mut config = SidekickConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SidekickToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

fn parse_color(value: &str) -> Result<Color, ConfigError> {
    parse_color_setting(value)
        .map_err(|e| ConfigError::ValidationError(format!("color {value:?}: {e}")))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut SidekickConfig, toml: &SidekickToml) -> Result<(), ConfigError> {
    if let Some(ref color) = toml.appearance.color {
        config.appearance.color = parse_color(color)?;
    }
    if let Some(scale) = toml.appearance.scale {
        config.appearance.scale = scale;
    }
    if let Some(reactive) = toml.appearance.audio_reactive {
        config.appearance.audio_reactive = reactive;
    }

    if toml.engine.seed.is_some() {
        config.seed = toml.engine.seed;
    }
    if let Some(fps) = toml.engine.fps {
        config.fps = fps;
    }
    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparseable numbers are ignored like the other env layers; a bad color
/// is an error since it cannot be partially applied.
fn apply_env_config(
    config: &mut SidekickConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(color) = env(ENV_COLOR) {
        config.appearance.color = parse_color(&color)?;
        config.source = ConfigSource::Env;
    }
    if let Some(scale) = env(ENV_SCALE) {
        if let Ok(s) = scale.parse::<f32>() {
            config.appearance.scale = s;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(reactive) = env(ENV_AUDIO_REACTIVE) {
        config.appearance.audio_reactive = reactive != "0" && reactive.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(seed) = env(ENV_SEED) {
        if let Ok(s) = seed.parse::<u64>() {
            config.seed = Some(s);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(fps) = env(ENV_FPS) {
        if let Ok(f) = fps.parse::<u32>() {
            config.fps = f;
            config.source = ConfigSource::Env;
        }
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Color override (hex or preset name)
    pub color: Option<String>,

    /// Scale override
    pub scale: Option<f32>,

    /// Audio reactivity override
    pub audio_reactive: Option<bool>,

    /// Seed override
    pub seed: Option<u64>,

    /// Refresh rate override
    pub fps: Option<u32>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set color override
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set scale override
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set audio reactivity override
    #[must_use]
    pub fn with_audio_reactive(mut self, enabled: bool) -> Self {
        self.audio_reactive = Some(enabled);
        self
    }

    /// Set seed override
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set refresh rate override
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.scale.is_none()
            && self.audio_reactive.is_none()
            && self.seed.is_none()
            && self.fps.is_none()
    }

    /// Apply overrides to a configuration and re-validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is invalid.
    pub fn apply(&self, config: &mut SidekickConfig) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Ok(());
        }
        config.source = ConfigSource::Cli;

        if let Some(ref color) = self.color {
            config.appearance.color = parse_color(color)?;
        }
        if let Some(scale) = self.scale {
            config.appearance.scale = scale;
        }
        if let Some(enabled) = self.audio_reactive {
            config.appearance.audio_reactive = enabled;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
