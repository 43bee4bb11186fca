//! Configuration file handling for ~/.driverlink/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Settings
//! structs live in [`super::settings`]; this module only does I/O and
//! INI mapping.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::{CaptureSettings, ConfigFile, EndpointSettings, LoggingSettings};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.driverlink/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults. Missing sections or keys
    /// fall back to their defaults; only malformed numeric values error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.driverlink/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("endpoints"))
            .set("receiver_url", &self.endpoints.receiver_url)
            .set("backend_url", &self.endpoints.backend_url);
        ini.with_section(Some("capture"))
            .set("interval_ms", self.capture.interval_ms.to_string())
            .set("position_port", self.capture.position_port.to_string())
            .set("allow_background", self.capture.allow_background.to_string());
        ini.with_section(Some("logging"))
            .set("directory", self.logging.directory.display().to_string())
            .set("file", &self.logging.file);

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut endpoints = EndpointSettings::default();
    if let Some(section) = ini.section(Some("endpoints")) {
        if let Some(url) = section.get("receiver_url") {
            endpoints.receiver_url = url.to_string();
        }
        if let Some(url) = section.get("backend_url") {
            endpoints.backend_url = url.to_string();
        }
    }

    let mut capture = CaptureSettings::default();
    if let Some(section) = ini.section(Some("capture")) {
        if let Some(value) = section.get("interval_ms") {
            capture.interval_ms = parse_number("capture", "interval_ms", value)?;
        }
        if let Some(value) = section.get("position_port") {
            capture.position_port = parse_number("capture", "position_port", value)?;
        }
        if let Some(value) = section.get("allow_background") {
            capture.allow_background =
                value
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "capture".to_string(),
                        key: "allow_background".to_string(),
                        value: value.to_string(),
                        reason: "expected true or false".to_string(),
                    })?;
        }
    }

    let mut logging = LoggingSettings::default();
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(dir) = section.get("directory") {
            logging.directory = PathBuf::from(dir);
        }
        if let Some(file) = section.get("file") {
            logging.file = file.to_string();
        }
    }

    Ok(ConfigFile {
        endpoints,
        capture,
        logging,
    })
}

fn parse_number<T: std::str::FromStr>(
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigFileError> {
    value.parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a number".to_string(),
    })
}

/// Get the path to the config directory (~/.driverlink).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".driverlink")
}

/// Get the path to the config file (~/.driverlink/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
