//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Default receiver address on an Android hotspot (the phone acts as the
/// network gateway at .43.1, the receiver binds port 8081).
pub const DEFAULT_RECEIVER_URL: &str = "http://192.168.43.1:8081";

/// Default backend server address (development convention).
pub const DEFAULT_BACKEND_URL: &str = "http://192.168.1.40:5000";

/// Default capture interval: 500 ms, i.e. a nominal 2 Hz fix rate.
pub const DEFAULT_CAPTURE_INTERVAL_MS: u64 = 500;

/// Default UDP port the positioning daemon sends fixes to.
pub const DEFAULT_POSITION_PORT: u16 = 48600;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Endpoint settings
    pub endpoints: EndpointSettings,
    /// Capture settings
    pub capture: CaptureSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Endpoint configuration for the receiver and backend.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSettings {
    /// Base URL of the on-vehicle receiver (`/gps` and `/health` live here).
    pub receiver_url: String,
    /// Base URL of the backend server (consumed by the surrounding app's
    /// REST client, not by the streaming core).
    pub backend_url: String,
}

/// Capture configuration for the location source.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Interval between delivered fixes in milliseconds.
    /// Default: 500 (2 Hz).
    pub interval_ms: u64,
    /// UDP port to listen on for positioning daemon datagrams.
    pub position_port: u16,
    /// Whether capture must continue while the app is backgrounded.
    /// A source that cannot guarantee this must refuse to start.
    pub allow_background: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log directory path
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            receiver_url: DEFAULT_RECEIVER_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_CAPTURE_INTERVAL_MS,
            position_port: DEFAULT_POSITION_PORT,
            allow_background: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(crate::logging::default_log_dir()),
            file: crate::logging::default_log_file().to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            endpoints: EndpointSettings::default(),
            capture: CaptureSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.endpoints.receiver_url, DEFAULT_RECEIVER_URL);
        assert_eq!(config.endpoints.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.capture.interval_ms, 500);
        assert_eq!(config.capture.position_port, DEFAULT_POSITION_PORT);
        assert!(config.capture.allow_background);
        assert_eq!(config.logging.file, "driverlink.log");
    }
}
