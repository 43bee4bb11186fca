//! Stream session controller - start/stop state machine for the pipeline.
//!
//! States: `Idle -> RequestingPermission -> Active -> Idle` (explicit
//! stop), with `RequestingPermission -> Idle` on permission denial. At
//! most one session is active at a time; `start()` while active is a
//! no-op that reports success.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::error::StreamError;
use super::publisher::{IngestClient, TelemetryPublisher};
use super::source::LocationSource;

/// Lifecycle state of the streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No capture registered.
    Idle,
    /// Waiting on the platform permission prompts.
    RequestingPermission,
    /// Capture registered, fixes flowing to the publisher.
    Active,
    /// Tearing down the capture registration.
    Stopping,
}

/// Owns the background capture+publish pipeline lifecycle.
///
/// The controller holds only a capability handle on the source
/// (begin/end/query); the platform-level registration itself is owned by
/// the [`LocationSource`]. The cached [`SessionStatus`] is a convenience
/// for display - [`is_active`](StreamSession::is_active) always asks the
/// source, so the reported state survives restarts that preserve the
/// platform registration.
pub struct StreamSession<S: LocationSource, C: IngestClient + 'static> {
    source: S,
    publisher: TelemetryPublisher<C>,
    status: Mutex<SessionStatus>,
}

impl<S: LocationSource, C: IngestClient + 'static> StreamSession<S, C> {
    /// Create a session wiring `publisher` as the fix handler for `source`.
    pub fn new(source: S, publisher: TelemetryPublisher<C>) -> Self {
        Self {
            source,
            publisher,
            status: Mutex::new(SessionStatus::Idle),
        }
    }

    /// Start the background capture+publish pipeline.
    ///
    /// Idempotent: returns success without a second registration when a
    /// capture already exists. On permission denial or registration
    /// failure the session rolls back to Idle - it is never left in an
    /// Active-but-broken state.
    pub async fn start(&self) -> Result<(), StreamError> {
        if self.source.is_capturing() {
            debug!("Stream already active, start is a no-op");
            self.set_status(SessionStatus::Active);
            return Ok(());
        }

        self.set_status(SessionStatus::RequestingPermission);

        if !self.source.request_permissions().await {
            warn!("Positioning permission denied, stream not started");
            self.set_status(SessionStatus::Idle);
            return Err(StreamError::PermissionDenied);
        }

        match self.source.begin_capture(self.publisher.fix_handler()).await {
            Ok(()) => {
                self.set_status(SessionStatus::Active);
                info!("GPS stream started");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Capture registration failed, rolling back to idle");
                self.set_status(SessionStatus::Idle);
                Err(StreamError::CaptureStart(e))
            }
        }
    }

    /// Stop the pipeline. No-op when no capture is registered. Publishes
    /// already in flight are allowed to finish in the background.
    pub async fn stop(&self) {
        if !self.source.is_capturing() {
            debug!("No active stream, stop is a no-op");
            self.set_status(SessionStatus::Idle);
            return;
        }

        self.set_status(SessionStatus::Stopping);
        self.source.end_capture().await;
        self.set_status(SessionStatus::Idle);
        info!("GPS stream stopped");
    }

    /// Whether a capture registration exists. The source is authoritative;
    /// the cached status is display-only.
    pub fn is_active(&self) -> bool {
        self.source.is_capturing()
    }

    /// Cached lifecycle state, for display.
    pub fn status(&self) -> SessionStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The publisher feeding this session's fixes to the receiver.
    pub fn publisher(&self) -> &TelemetryPublisher<C> {
        &self.publisher
    }

    /// The location source driving this session.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn set_status(&self, status: SessionStatus) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = status;
    }
}
