//! GPS Streaming Core
//!
//! This module is the stateful heart of the driver companion client: it
//! captures position fixes from the device's positioning daemon and streams
//! them to the on-vehicle receiver over the local network.
//!
//! # Architecture
//!
//! ```text
//! positioning daemon --UDP--> UdpLocationSource --fix--> TelemetryPublisher
//!                                                              |
//!                                                    POST {receiver}/gps
//!
//! ConnectivityProbe --GET {receiver}/health--> (UI indicator only)
//! ```
//!
//! [`StreamSession`] owns the lifecycle: `start()` acquires positioning
//! permission, registers the capture with the publisher wired as the fix
//! handler, and is idempotent; `stop()` ends the capture registration.
//! The session never surfaces per-fix failures: a moving vehicle on a phone
//! hotspot routinely loses and regains the link, so each fix is delivered
//! fire-and-forget and a failed delivery is simply superseded by the next
//! fix 500 ms later. The [`ConnectivityProbe`] runs on an independent path
//! and never gates publishing.
//!
//! # Components
//!
//! - [`fix`] - `PositionFix` and the `GpsPayload` wire format
//! - [`source`] - `LocationSource` trait and the UDP-backed implementation
//! - [`publisher`] - `TelemetryPublisher` fire-and-forget delivery
//! - [`session`] - `StreamSession` start/stop state machine
//! - [`probe`] - `ConnectivityProbe` health checks and the poll-loop monitor
//! - [`error`] - `StreamError` / `SourceError`

mod error;
mod fix;
mod probe;
mod publisher;
mod session;
mod source;

pub use error::{SourceError, StreamError};
pub use fix::{GpsPayload, PositionFix};
pub use probe::{
    ConnectivityMonitor, ConnectivityProbe, ConnectivityStatus, DEFAULT_PROBE_INTERVAL,
};
pub use publisher::{HttpIngestClient, IngestClient, IngestError, TelemetryPublisher};
pub use session::{SessionStatus, StreamSession};
pub use source::{
    CaptureConfig, FixHandler, LocationSource, UdpLocationSource, MAX_DATAGRAM_SIZE,
};
