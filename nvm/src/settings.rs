use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{SETTINGS_DIR, SETTINGS_FILE};
use crate::error::{Result, VmError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Stop with a fault after this many executed instructions
    pub max_steps: Option<u64>,

    /// Print the register file to stderr after the run
    pub dump_registers: bool,
}

impl MachineSettings {
    /// Get the path to the default settings file
    pub fn settings_path() -> PathBuf {
        // Try to use XDG config directory on Unix-like systems
        if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(config_dir).join(SETTINGS_DIR).join(SETTINGS_FILE)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config").join(SETTINGS_DIR).join(SETTINGS_FILE)
        } else {
            PathBuf::from(".nvm_settings.json")
        }
    }

    /// Load settings from the default location, or return defaults if the
    /// file is missing or unusable.
    pub fn load() -> Self {
        let path = Self::settings_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path. Unlike [`MachineSettings::load`],
    /// a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| VmError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings: Self = serde_json::from_str(&contents).map_err(|e| VmError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
