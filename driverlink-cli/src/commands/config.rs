//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! commands for viewing and modifying configuration settings from the
//! command line.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Subcommand;

use driverlink::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., endpoints.receiver_url)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., endpoints.receiver_url)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

/// All known configuration keys, in display order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ConfigKey {
    ReceiverUrl,
    BackendUrl,
    IntervalMs,
    PositionPort,
    AllowBackground,
    LogDirectory,
    LogFile,
}

impl ConfigKey {
    fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ReceiverUrl,
            ConfigKey::BackendUrl,
            ConfigKey::IntervalMs,
            ConfigKey::PositionPort,
            ConfigKey::AllowBackground,
            ConfigKey::LogDirectory,
            ConfigKey::LogFile,
        ]
    }

    fn section(&self) -> &'static str {
        match self {
            ConfigKey::ReceiverUrl | ConfigKey::BackendUrl => "endpoints",
            ConfigKey::IntervalMs | ConfigKey::PositionPort | ConfigKey::AllowBackground => {
                "capture"
            }
            ConfigKey::LogDirectory | ConfigKey::LogFile => "logging",
        }
    }

    fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ReceiverUrl => "receiver_url",
            ConfigKey::BackendUrl => "backend_url",
            ConfigKey::IntervalMs => "interval_ms",
            ConfigKey::PositionPort => "position_port",
            ConfigKey::AllowBackground => "allow_background",
            ConfigKey::LogDirectory => "directory",
            ConfigKey::LogFile => "file",
        }
    }

    fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ReceiverUrl => config.endpoints.receiver_url.clone(),
            ConfigKey::BackendUrl => config.endpoints.backend_url.clone(),
            ConfigKey::IntervalMs => config.capture.interval_ms.to_string(),
            ConfigKey::PositionPort => config.capture.position_port.to_string(),
            ConfigKey::AllowBackground => config.capture.allow_background.to_string(),
            ConfigKey::LogDirectory => config.logging.directory.display().to_string(),
            ConfigKey::LogFile => config.logging.file.clone(),
        }
    }

    fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), String> {
        match self {
            ConfigKey::ReceiverUrl => {
                if value.trim().is_empty() {
                    return Err("receiver URL must not be empty".to_string());
                }
                config.endpoints.receiver_url = value.to_string();
            }
            ConfigKey::BackendUrl => {
                if value.trim().is_empty() {
                    return Err("backend URL must not be empty".to_string());
                }
                config.endpoints.backend_url = value.to_string();
            }
            ConfigKey::IntervalMs => {
                config.capture.interval_ms = value
                    .parse()
                    .map_err(|_| format!("'{}' is not a valid interval in ms", value))?;
            }
            ConfigKey::PositionPort => {
                config.capture.position_port = value
                    .parse()
                    .map_err(|_| format!("'{}' is not a valid UDP port", value))?;
            }
            ConfigKey::AllowBackground => {
                config.capture.allow_background = value
                    .parse()
                    .map_err(|_| format!("'{}' is not true or false", value))?;
            }
            ConfigKey::LogDirectory => {
                config.logging.directory = PathBuf::from(value);
            }
            ConfigKey::LogFile => {
                config.logging.file = value.to_string();
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .find(|key| key.name() == s)
            .copied()
            .ok_or(())
    }
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'driverlink config list' to see available keys.",
            key
        ))
    })?;

    let config = ConfigFile::load().unwrap_or_default();
    println!("{}", config_key.get(&config));

    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'driverlink config list' to see available keys.",
            key
        ))
    })?;

    let mut config = ConfigFile::load().unwrap_or_default();
    config_key
        .set(&mut config, value)
        .map_err(CliError::Config)?;
    config.save()?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        println!("  {} = {}", key.key_name(), key.get(&config));
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
