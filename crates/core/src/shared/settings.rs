use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_GENERATOR_URL,
    DEFAULT_MAX_REDIRECTS,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for fetching, sampling and generation.
///
/// Every field has a default, so a settings file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch_timeout_secs: u64,
    pub max_redirects: usize,
    pub generation_timeout_secs: u64,
    pub generator_url: String,
    pub concurrent_sampling: bool,
    pub reuse_download: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            concurrent_sampling: true,
            reuse_download: false,
        }
    }
}

impl Settings {
    /// `<config_dir>/Stylize/settings.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Stylize").join("settings.json"))
    }

    /// Loads the per-user settings file, falling back to defaults when it
    /// is missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Loads an explicitly named file. Unlike [`Settings::load`], failures surface.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Checks the values once every source (file, flags) has been applied.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fetch_timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                field: "fetch_timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.generation_timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                field: "generation_timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.generator_url.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "generator_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
