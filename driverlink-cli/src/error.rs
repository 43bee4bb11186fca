//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use driverlink::config::ConfigFileError;
use driverlink::stream::{SourceError, StreamError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start or run a streaming session
    Stream(StreamError),
    /// Receiver did not answer the health probe
    Unreachable { url: String },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Stream(StreamError::CaptureStart(SourceError::SocketBind {
                port, ..
            })) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Another process is already listening on UDP port {}", port);
                eprintln!("  2. Port below 1024 requires elevated privileges");
                eprintln!();
                eprintln!("Change the port with: driverlink config set capture.position_port <port>");
            }
            CliError::Stream(StreamError::PermissionDenied) => {
                eprintln!();
                eprintln!("The location source refused to grant capture permission.");
            }
            CliError::Unreachable { .. } => {
                eprintln!();
                eprintln!("Make sure:");
                eprintln!("  1. The receiver device is powered on and on the same network");
                eprintln!("  2. endpoints.receiver_url points at the right address");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Stream(e) => write!(f, "Streaming error: {}", e),
            CliError::Unreachable { url } => {
                write!(f, "Receiver at {} is not reachable", url)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for CliError {
    fn from(e: StreamError) -> Self {
        CliError::Stream(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}
