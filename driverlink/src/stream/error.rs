//! Error types for the GPS streaming core.

use thiserror::Error;

/// Errors raised by a location source when registering a capture.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to bind the UDP socket for the positioning daemon.
    #[error("Failed to bind UDP socket on port {port}: {source}")]
    SocketBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Background continuation was requested but this source cannot
    /// guarantee it. Sources advertise the capability or refuse to start.
    #[error("Background capture requested but not supported by this source")]
    BackgroundUnsupported,
}

/// Errors surfaced to the UI layer by the stream session controller.
///
/// Everything below the controller boundary degrades silently; only
/// permission denial and a failed capture registration reach the caller.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The user declined foreground or background positioning permission.
    /// Not retried automatically; re-invoke `start()` after it is granted.
    #[error("Permission required: foreground and background positioning must be granted")]
    PermissionDenied,

    /// Capture registration failed; the session was rolled back to Idle.
    #[error("Could not start stream: {0}")]
    CaptureStart(#[from] SourceError),

    /// Failed to create the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}
