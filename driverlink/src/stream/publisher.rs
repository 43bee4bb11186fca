//! Fire-and-forget delivery of position fixes to the receiver.
//!
//! Each captured fix becomes one unawaited `POST {receiver_url}/gps`.
//! Delivery failures are swallowed: the data is perishable (superseded
//! every 500 ms), so retrying a stale fix would only compete with fresh
//! ones for bandwidth. Completion order carries no guarantee - ordering is
//! only meaningful at capture time via the payload's `timestamp`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, trace};

use super::error::StreamError;
use super::fix::{GpsPayload, PositionFix};
use super::source::FixHandler;
use crate::config::SharedEndpoints;

/// Default timeout for publish requests. Publishes are unawaited, so this
/// only bounds how long a dead request lingers in the background.
const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for a single delivery attempt.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// The request could not be sent (unreachable, timeout, DNS).
    #[error("Request failed: {0}")]
    Request(String),

    /// The receiver answered with a non-2xx status.
    #[error("HTTP {0} from receiver")]
    Status(u16),
}

/// Trait for delivering GPS payloads to the receiver's ingestion endpoint.
///
/// The seam between the publisher and the HTTP stack, allowing mock
/// clients in tests.
pub trait IngestClient: Send + Sync {
    /// POST one payload as JSON to `url`. Only the HTTP status matters;
    /// no response body is consumed.
    fn post_gps(
        &self,
        url: &str,
        payload: &GpsPayload,
    ) -> impl Future<Output = Result<(), IngestError>> + Send;
}

/// Ingest client backed by `reqwest` with a bounded timeout.
#[derive(Clone)]
pub struct HttpIngestClient {
    client: reqwest::Client,
}

impl HttpIngestClient {
    /// Create a client with the default publish timeout.
    pub fn new() -> Result<Self, StreamError> {
        Self::with_timeout(DEFAULT_PUBLISH_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StreamError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

impl IngestClient for HttpIngestClient {
    async fn post_gps(&self, url: &str, payload: &GpsPayload) -> Result<(), IngestError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| IngestError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Publishes each fix to the receiver, fire-and-forget.
///
/// `publish` returns control immediately; the POST runs as an independent
/// spawned task. The receiver URL is read from [`SharedEndpoints`] at each
/// initiation, so an operator change takes effect on the very next fix
/// with no retroactive redirection of requests already in flight.
pub struct TelemetryPublisher<C: IngestClient> {
    client: Arc<C>,
    endpoints: SharedEndpoints,
    delivered: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl<C: IngestClient> Clone for TelemetryPublisher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            endpoints: self.endpoints.clone(),
            delivered: Arc::clone(&self.delivered),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

impl<C: IngestClient + 'static> TelemetryPublisher<C> {
    /// Create a publisher targeting the receiver in `endpoints`.
    pub fn new(client: C, endpoints: SharedEndpoints) -> Self {
        Self {
            client: Arc::new(client),
            endpoints,
            delivered: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish one fix. Never blocks, never errors; must be called within
    /// a Tokio runtime.
    pub fn publish(&self, fix: PositionFix) {
        let payload = GpsPayload::from(&fix);
        // Target URL is fixed at initiation time.
        let url = format!("{}/gps", self.endpoints.receiver_url());

        let client = Arc::clone(&self.client);
        let delivered = Arc::clone(&self.delivered);
        let dropped = Arc::clone(&self.dropped);

        tokio::spawn(async move {
            match client.post_gps(&url, &payload).await {
                Ok(()) => {
                    let count = delivered.fetch_add(1, Ordering::Relaxed) + 1;
                    if count == 1 {
                        info!(url, "First fix delivered to receiver");
                    } else {
                        trace!(url, timestamp = payload.timestamp, "Fix delivered");
                    }
                }
                Err(e) => {
                    // Dropped on purpose; the next tick supersedes this fix.
                    dropped.fetch_add(1, Ordering::Relaxed);
                    debug!(url, error = %e, "Dropped fix, receiver unreachable");
                }
            }
        });
    }

    /// Wrap this publisher as a [`FixHandler`] for a location source.
    pub fn fix_handler(&self) -> FixHandler {
        let publisher = self.clone();
        Arc::new(move |fix| publisher.publish(fix))
    }

    /// Number of fixes acknowledged by the receiver.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Number of fixes dropped on delivery failure.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
