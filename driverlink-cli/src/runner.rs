//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization and config loading to reduce
//! duplication across command handlers.

use tracing::info;

use driverlink::config::ConfigFile;
use driverlink::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let log_dir = config.logging.directory.to_string_lossy().to_string();
        let logging_guard = init_logging(&log_dir, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("DriverLink v{}", driverlink::VERSION);
        info!("DriverLink CLI: {} command", command);
    }
}
