//! Connectivity prober - liveness checks against the receiver.
//!
//! [`ConnectivityProbe`] performs one `GET {receiver_url}/health` with a
//! fixed 3 second timeout and maps every possible failure to
//! `connected: false` - it never errors to the caller. It is stateless
//! between calls and completely independent of the publish path: the
//! probe feeds the UI indicator and does not gate publishing.
//!
//! [`ConnectivityMonitor`] wraps the probe in a poll-loop daemon (default
//! cadence 5 s) publishing the latest status on a `watch` channel.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::error::StreamError;
use crate::config::SharedEndpoints;
use crate::time::epoch_millis_now;

/// Fixed timeout for health probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default interval between probes when monitored.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Transient read model of receiver reachability.
///
/// Recomputed on every probe, never persisted.
#[derive(Debug, Clone)]
pub struct ConnectivityStatus {
    /// True only when the health endpoint answered 2xx.
    pub connected: bool,
    /// When the probe completed, epoch milliseconds. Zero when no probe
    /// has run yet.
    pub last_checked_epoch_ms: i64,
    /// Diagnostic payload from the health endpoint, when present and
    /// JSON-parseable.
    pub diagnostics: Option<serde_json::Value>,
}

impl ConnectivityStatus {
    /// Status before any probe has run.
    pub fn unchecked() -> Self {
        Self {
            connected: false,
            last_checked_epoch_ms: 0,
            diagnostics: None,
        }
    }

    fn disconnected() -> Self {
        Self {
            connected: false,
            last_checked_epoch_ms: epoch_millis_now(),
            diagnostics: None,
        }
    }
}

/// Probes the receiver's health endpoint.
pub struct ConnectivityProbe {
    http: reqwest::Client,
    endpoints: SharedEndpoints,
}

impl ConnectivityProbe {
    /// Create a probe reading the receiver URL from `endpoints` on every
    /// check.
    pub fn new(endpoints: SharedEndpoints) -> Result<Self, StreamError> {
        let http = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| StreamError::HttpClient(e.to_string()))?;

        Ok(Self { http, endpoints })
    }

    /// Check receiver liveness. Never errors: timeouts, connection
    /// failures, and non-2xx responses all yield `connected: false`.
    pub async fn check_connection(&self) -> ConnectivityStatus {
        let url = format!("{}/health", self.endpoints.receiver_url());

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let diagnostics = response.json::<serde_json::Value>().await.ok();
                trace!(url, "Receiver healthy");
                ConnectivityStatus {
                    connected: true,
                    last_checked_epoch_ms: epoch_millis_now(),
                    diagnostics,
                }
            }
            Ok(response) => {
                debug!(url, status = response.status().as_u16(), "Receiver health check failed");
                ConnectivityStatus::disconnected()
            }
            Err(e) => {
                debug!(url, error = %e, "Receiver unreachable");
                ConnectivityStatus::disconnected()
            }
        }
    }
}

/// Poll-loop daemon publishing the latest [`ConnectivityStatus`].
///
/// `start()` spawns an async task that probes on a fixed interval and
/// broadcasts each result on a `watch` channel; the loop stops when the
/// cancellation token fires or every receiver is dropped.
pub struct ConnectivityMonitor {
    probe: ConnectivityProbe,
    interval: Duration,
}

impl ConnectivityMonitor {
    /// Create a monitor with the default 5 second cadence.
    pub fn new(probe: ConnectivityProbe) -> Self {
        Self::with_interval(probe, DEFAULT_PROBE_INTERVAL)
    }

    /// Create a monitor with a custom cadence.
    pub fn with_interval(probe: ConnectivityProbe, interval: Duration) -> Self {
        Self { probe, interval }
    }

    /// Start the poll loop. Returns the status channel and a cancellation
    /// token that stops the loop.
    pub fn start(self) -> (watch::Receiver<ConnectivityStatus>, CancellationToken) {
        let (tx, rx) = watch::channel(ConnectivityStatus::unchecked());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            self.run(tx, token).await;
        });

        (rx, cancel)
    }

    async fn run(self, tx: watch::Sender<ConnectivityStatus>, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Connectivity monitor started"
        );

        let mut interval = tokio::time::interval(self.interval);
        let mut was_connected = false;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let status = self.probe.check_connection().await;

            // Transitions at info, steady state at trace.
            if status.connected != was_connected {
                info!(connected = status.connected, "Receiver connectivity changed");
                was_connected = status.connected;
            }

            if tx.send(status).is_err() {
                debug!("Connectivity watchers dropped, stopping monitor");
                break;
            }
        }

        info!("Connectivity monitor stopped");
    }
}
