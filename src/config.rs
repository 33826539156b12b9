//! Viewer configuration with defaults and JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::Rgb;
use crate::display::{
    DEFAULT_RENDER_HEIGHT, DEFAULT_RENDER_WIDTH, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};
use crate::orbit::OrbitConfig;
use crate::traits::{TraitError, Traits};

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[source] serde_json::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] serde_json::Error),

    #[error("invalid planet traits: {0}")]
    Traits(#[from] TraitError),

    #[error("{name} must be non-zero")]
    ZeroDimension { name: &'static str },

    #[error("{name} is {value}, the maximum is {max}")]
    DimensionTooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },
}

/// Largest accepted width or height for the render target and the window
pub const MAX_DIMENSION: u32 = 8192;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Internal render target, upscaled to the window
    pub render_width: u32,
    pub render_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Automatic yaw in radians per second
    pub spin_rate: f64,
    pub orbit: OrbitConfig,
    pub background: Rgb,
    /// Used when RUST_LOG is unset
    pub log_filter: String,
    pub traits: Traits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            vsync: true,
            spin_rate: 0.4,
            orbit: OrbitConfig::default(),
            background: Rgb::new(0, 0, 0),
            log_filter: "info".to_string(),
            traits: Traits::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: AppConfig =
            serde_json::from_str(&contents).map_err(ConfigError::ParseError)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
            }
        }
        let serialized =
            serde_json::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("render_width", self.render_width),
            ("render_height", self.render_height),
            ("window_width", self.window_width),
            ("window_height", self.window_height),
        ];
        if let Some(&(name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroDimension { name });
        }
        if let Some(&(name, value)) = dims.iter().find(|(_, v)| *v > MAX_DIMENSION) {
            return Err(ConfigError::DimensionTooLarge {
                name,
                value,
                max: MAX_DIMENSION,
            });
        }
        self.traits.validate()?;
        Ok(())
    }
}
