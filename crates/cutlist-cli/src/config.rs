//! `cutlist.toml` configuration.

use std::path::{Path, PathBuf};

use cutlist_edl::{EdlFormat, MediaInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "cutlist.toml";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallbacks for media properties not given on the command line
    pub media: MediaConfig,
    pub export: ExportConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub fps: Option<f64>,
    /// Media length in seconds, used to resolve open segment ends
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format when `--to` is omitted
    pub format: EdlFormat,
    /// Include the gap before the first segment when inverting
    pub include_first: bool,
    /// Include the gap after the last segment when inverting
    pub include_last: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: EdlFormat::Csv,
            include_first: true,
            include_last: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level used when neither `RUST_LOG` nor `-v` is given
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `cutlist/cutlist.toml` in the user's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutlist").join(CONFIG_FILE_NAME))
    }

    /// Load an explicit file, or the default file if it exists, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "loading configuration");
            return Self::from_file(path);
        }
        match Self::default_path().filter(|path| path.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "loading configuration");
                Self::from_file(path)
            }
            None => {
                debug!("using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.media.validate()?;
        if !self.export.format.can_export() {
            return Err(ConfigError::InvalidValue {
                key: "export.format".to_string(),
                value: self.export.format.to_string(),
            });
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log.level".to_string(),
                value: self.log.level.clone(),
            });
        }
        Ok(())
    }

    /// Media info with command line values taking precedence.
    pub fn media_info(&self, fps: Option<f64>, duration: Option<f64>) -> MediaInfo {
        MediaInfo {
            fps: fps.or(self.media.fps),
            duration: duration.or(self.media.duration),
        }
    }
}

impl MediaConfig {
    fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if let Some(fps) = self.fps.filter(|f| !positive(*f)) {
            return Err(ConfigError::InvalidValue {
                key: "media.fps".to_string(),
                value: fps.to_string(),
            });
        }
        if let Some(duration) = self.duration.filter(|d| !positive(*d)) {
            return Err(ConfigError::InvalidValue {
                key: "media.duration".to_string(),
                value: duration.to_string(),
            });
        }
        Ok(())
    }
}
