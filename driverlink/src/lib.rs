//! Driverlink - GPS telemetry streaming client for fleet safety
//!
//! This library provides the core of the driver companion client: it captures
//! position fixes from the device's positioning daemon at 2 Hz and streams
//! them to an on-vehicle receiver over the local network, tolerating an
//! intermittently-reachable peer without ever interrupting the trip.
//!
//! # High-Level API
//!
//! For most use cases, wire a [`stream::StreamSession`] from a location
//! source and a publisher:
//!
//! ```ignore
//! use driverlink::config::SharedEndpoints;
//! use driverlink::stream::{
//!     HttpIngestClient, StreamSession, TelemetryPublisher, UdpLocationSource,
//! };
//!
//! let endpoints = SharedEndpoints::with_defaults();
//! let publisher = TelemetryPublisher::new(HttpIngestClient::new()?, endpoints.clone());
//! let session = StreamSession::new(UdpLocationSource::with_defaults(), publisher);
//!
//! session.start().await?;
//! // ... trip in progress, fixes flow to {receiver_url}/gps ...
//! session.stop().await;
//! ```

pub mod config;
pub mod logging;
pub mod stream;
pub mod time;

/// Version of the Driverlink library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
