use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_DETECTOR_TIMEOUT_SECS, DEFAULT_DETECTOR_URL, FACE_MESH_LANDMARK_COUNT,
    SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
};
use super::image_codec::EncodedFormat;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("unable to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detector_url: String,
    pub detector_timeout_secs: u64,
    pub expected_landmarks: usize,
    /// JSON rule table replacing the built-in one.
    pub rules_path: Option<PathBuf>,
    pub product_simulation: bool,
    pub product_days: u32,
    pub image_format: EncodedFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detector_url: DEFAULT_DETECTOR_URL.to_string(),
            detector_timeout_secs: DEFAULT_DETECTOR_TIMEOUT_SECS,
            expected_landmarks: FACE_MESH_LANDMARK_COUNT,
            rules_path: None,
            product_simulation: false,
            product_days: 30,
            image_format: EncodedFormat::Jpeg,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads `explicit` if given, otherwise the platform config file when it
    /// exists, otherwise defaults. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match Self::config_path().filter(|p| p.is_file()) {
            Some(path) => Self::from_path(&path),
            None => {
                log::debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Days of product use to simulate, if product simulation is enabled.
    pub fn product_days_option(&self) -> Option<u32> {
        self.product_simulation.then_some(self.product_days)
    }
}
