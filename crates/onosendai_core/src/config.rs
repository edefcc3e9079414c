//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe every tunable of a session in one serde-friendly struct.
//! - Load it from JSON with every field optional.
//!
//! # Invariants
//! - A missing field takes its documented default.
//! - `validate()` runs on every load path.

use crate::bookmark::store::DEFAULT_BOOKMARK_KEY;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default camera distance when cycling through connected nodes.
pub const DEFAULT_CYCLE_CAMERA_DISTANCE: f64 = 50.0;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; file logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Bookmark database file; an in-memory database is used when unset.
    pub db_path: Option<PathBuf>,
    pub bookmark_key: String,
    /// Largest bookmark blob the sink accepts, in bytes.
    pub storage_quota_bytes: Option<usize>,
    pub cycle_camera_distance: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            bookmark_key: DEFAULT_BOOKMARK_KEY.to_string(),
            storage_quota_bytes: None,
            cycle_camera_distance: DEFAULT_CYCLE_CAMERA_DISTANCE,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid config json: {message}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(_) | Self::Invalid(_) => None,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Rejects values no session can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bookmark_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "bookmark_key must not be empty".to_string(),
            ));
        }
        if !(self.cycle_camera_distance.is_finite() && self.cycle_camera_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cycle_camera_distance must be a positive number, got {}",
                self.cycle_camera_distance
            )));
        }
        Ok(())
    }
}
