//! Configuration for Driverlink components.
//!
//! Two layers:
//!
//! - [`ConfigFile`] and friends: the on-disk `~/.driverlink/config.ini`,
//!   loaded once at startup with sensible defaults for anything missing.
//! - [`SharedEndpoints`]: the runtime-mutable endpoint store injected into
//!   the prober and publisher. Consumers read it on every operation, so an
//!   operator change takes effect on the very next probe/publish.

mod endpoints;
mod file;
mod settings;

pub use endpoints::SharedEndpoints;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CaptureSettings, ConfigFile, EndpointSettings, LoggingSettings, DEFAULT_BACKEND_URL,
    DEFAULT_CAPTURE_INTERVAL_MS, DEFAULT_POSITION_PORT, DEFAULT_RECEIVER_URL,
};
