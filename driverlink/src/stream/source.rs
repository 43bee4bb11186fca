//! Location source abstraction and the UDP-backed implementation.
//!
//! The [`LocationSource`] trait models the platform's positioning
//! capability: permission acquisition, a recurring capture registration at
//! a bounded rate, and idempotent teardown. The capture contract is
//! "best-effort continuous" - a bad reading is logged and skipped, never
//! allowed to terminate the subscription.
//!
//! [`UdpLocationSource`] is the production source: the device's positioning
//! daemon sends JSON position datagrams to a local UDP port, and the
//! capture task throttles delivery to the nominal 2 Hz rate. A bound socket
//! keeps receiving regardless of UI/screen state, so this source advertises
//! background capability.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::error::SourceError;
use super::fix::PositionFix;
use crate::config::{CaptureSettings, DEFAULT_CAPTURE_INTERVAL_MS, DEFAULT_POSITION_PORT};
use crate::time::epoch_millis_now;

/// Maximum datagram size we expect from the positioning daemon.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// Callback invoked once per delivered fix.
pub type FixHandler = Arc<dyn Fn(PositionFix) + Send + Sync>;

/// Abstraction over the platform's positioning capability.
pub trait LocationSource: Send + Sync {
    /// Request foreground positioning permission, then (only if that was
    /// granted) background permission. Returns true only if both are
    /// granted. Never errors; safe to call repeatedly.
    fn request_permissions(&self) -> impl Future<Output = bool> + Send;

    /// Whether this source can keep capturing while the application is
    /// backgrounded. A source asked for background continuation it cannot
    /// guarantee must refuse in [`begin_capture`](Self::begin_capture).
    fn supports_background(&self) -> bool;

    /// Register a recurring capture delivering fixes to `handler`.
    ///
    /// Idempotent: a second call while a registration exists is a no-op
    /// that reports success.
    fn begin_capture(
        &self,
        handler: FixHandler,
    ) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Whether a capture registration currently exists.
    fn is_capturing(&self) -> bool;

    /// End the capture registration. Idempotent; safe to call when no
    /// capture is registered.
    fn end_capture(&self) -> impl Future<Output = ()> + Send;
}

/// Capture configuration for [`UdpLocationSource`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// UDP port the positioning daemon sends datagrams to.
    pub port: u16,

    /// Minimum interval between delivered fixes (nominal rate; default
    /// 500 ms for 2 Hz). The distance filter is implicitly zero: fixes are
    /// forwarded even when the position has not changed.
    pub interval: Duration,

    /// Timeout for socket receive operations.
    pub recv_timeout: Duration,

    /// Whether capture must continue while the app is backgrounded.
    pub allow_background: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_POSITION_PORT,
            interval: Duration::from_millis(DEFAULT_CAPTURE_INTERVAL_MS),
            recv_timeout: Duration::from_millis(500),
            allow_background: true,
        }
    }
}

impl From<&CaptureSettings> for CaptureConfig {
    fn from(settings: &CaptureSettings) -> Self {
        Self {
            port: settings.position_port,
            interval: Duration::from_millis(settings.interval_ms),
            recv_timeout: Duration::from_millis(500),
            allow_background: settings.allow_background,
        }
    }
}

/// Position datagram sent by the positioning daemon.
///
/// Our own type, decoupled from the daemon: unknown fields are ignored and
/// optional attributes default to null. `speed` is meters/second.
#[derive(Debug, Deserialize)]
struct PositionDatagram {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    heading: Option<f64>,
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default)]
    altitude: Option<f64>,
    /// Capture time in epoch milliseconds; wall clock when absent.
    #[serde(default)]
    timestamp: Option<i64>,
}

fn parse_datagram(data: &[u8]) -> Result<PositionFix, serde_json::Error> {
    let datagram: PositionDatagram = serde_json::from_slice(data)?;
    Ok(PositionFix {
        latitude: datagram.latitude,
        longitude: datagram.longitude,
        speed_mps: datagram.speed,
        heading_deg: datagram.heading,
        accuracy_m: datagram.accuracy,
        altitude_m: datagram.altitude,
        captured_at_epoch_ms: datagram.timestamp.unwrap_or_else(epoch_millis_now),
    })
}

/// Handle to a running capture task.
struct CaptureHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
    bound_port: u16,
}

/// UDP-backed location source.
///
/// Listens for JSON position datagrams from the device's positioning
/// daemon and delivers them to the registered handler at a bounded rate.
pub struct UdpLocationSource {
    config: CaptureConfig,
    active: Mutex<Option<CaptureHandle>>,
}

impl UdpLocationSource {
    /// Create a new source with the given capture configuration.
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            active: Mutex::new(None),
        }
    }

    /// Create with default configuration (port 48600, 2 Hz).
    pub fn with_defaults() -> Self {
        Self::new(CaptureConfig::default())
    }

    /// Get the configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Port the capture socket is actually bound to, while capturing.
    /// Differs from [`port`](Self::port) when configured with port 0.
    pub fn bound_port(&self) -> Option<u16> {
        self.handle_slot().as_ref().map(|handle| handle.bound_port)
    }

    fn handle_slot(&self) -> std::sync::MutexGuard<'_, Option<CaptureHandle>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run the capture loop until cancelled.
    async fn run(
        socket: UdpSocket,
        config: CaptureConfig,
        handler: FixHandler,
        cancel: CancellationToken,
    ) {
        info!(
            port = config.port,
            interval_ms = config.interval.as_millis() as u64,
            "Capture started"
        );

        let mut buffer = [0u8; MAX_DATAGRAM_SIZE];
        let mut last_delivery: Option<Instant> = None;
        let mut last_epoch_ms: i64 = i64::MIN;
        let mut datagrams_received: u64 = 0;
        let mut fixes_delivered: u64 = 0;

        loop {
            let recv_result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = tokio::time::timeout(config.recv_timeout, socket.recv(&mut buffer)) => result,
            };

            match recv_result {
                Ok(Ok(len)) => {
                    datagrams_received += 1;

                    let mut fix = match parse_datagram(&buffer[..len]) {
                        Ok(fix) => fix,
                        Err(e) => {
                            // Skip this tick; the subscription must survive.
                            debug!(error = %e, len, "Discarding malformed position datagram");
                            continue;
                        }
                    };

                    // Throttle to the nominal capture rate.
                    if let Some(last) = last_delivery {
                        if last.elapsed() < config.interval {
                            trace!("Datagram inside capture interval, throttled");
                            continue;
                        }
                    }

                    // Timestamps are monotonically non-decreasing within a
                    // session even if the daemon's clock steps backwards.
                    if fix.captured_at_epoch_ms < last_epoch_ms {
                        fix.captured_at_epoch_ms = last_epoch_ms;
                    }
                    last_epoch_ms = fix.captured_at_epoch_ms;

                    fixes_delivered += 1;
                    if fixes_delivered == 1 {
                        info!(
                            lat = format!("{:.4}", fix.latitude),
                            lon = format!("{:.4}", fix.longitude),
                            "First position fix delivered"
                        );
                    } else {
                        trace!(
                            lat = format!("{:.4}", fix.latitude),
                            lon = format!("{:.4}", fix.longitude),
                            "Position fix #{}",
                            fixes_delivered
                        );
                    }

                    handler(fix);
                    last_delivery = Some(Instant::now());
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "UDP receive error");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(_) => {
                    trace!("No position data received (timeout)");
                }
            }
        }

        info!(datagrams_received, fixes_delivered, "Capture ended");
    }
}

impl LocationSource for UdpLocationSource {
    async fn request_permissions(&self) -> bool {
        // A local socket needs no OS positioning grant; both the foreground
        // and background scopes report granted.
        debug!("Positioning permissions granted (socket-backed source)");
        true
    }

    fn supports_background(&self) -> bool {
        true
    }

    async fn begin_capture(&self, handler: FixHandler) -> Result<(), SourceError> {
        if self.is_capturing() {
            debug!("Capture already registered, begin_capture is a no-op");
            return Ok(());
        }

        if self.config.allow_background && !self.supports_background() {
            return Err(SourceError::BackgroundUnsupported);
        }

        // Bind before spawning so registration failures surface to the caller.
        let socket = UdpSocket::bind(("0.0.0.0", self.config.port))
            .await
            .map_err(|e| SourceError::SocketBind {
                port: self.config.port,
                source: e,
            })?;

        let bound_port = socket
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or(self.config.port);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::run(
            socket,
            self.config.clone(),
            handler,
            cancel.clone(),
        ));

        *self.handle_slot() = Some(CaptureHandle {
            cancel,
            task,
            bound_port,
        });
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.handle_slot()
            .as_ref()
            .map(|handle| !handle.task.is_finished())
            .unwrap_or(false)
    }

    async fn end_capture(&self) {
        let handle = self.handle_slot().take();
        if let Some(handle) = handle {
            handle.cancel.cancel();
            let _ = handle.task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.port, DEFAULT_POSITION_PORT);
        assert_eq!(config.interval, Duration::from_millis(500));
        assert!(config.allow_background);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = CaptureSettings {
            interval_ms: 250,
            position_port: 40001,
            allow_background: false,
        };
        let config = CaptureConfig::from(&settings);
        assert_eq!(config.port, 40001);
        assert_eq!(config.interval, Duration::from_millis(250));
        assert!(!config.allow_background);
    }

    #[test]
    fn test_parse_datagram_full() {
        let json = br#"{
            "latitude": 52.52,
            "longitude": 13.405,
            "speed": 8.5,
            "heading": 180.0,
            "accuracy": 4.2,
            "altitude": 35.0,
            "timestamp": 1700000000000
        }"#;

        let fix = parse_datagram(json).unwrap();
        assert!((fix.latitude - 52.52).abs() < 1e-9);
        assert!((fix.longitude - 13.405).abs() < 1e-9);
        assert_eq!(fix.speed_mps, Some(8.5));
        assert_eq!(fix.heading_deg, Some(180.0));
        assert_eq!(fix.captured_at_epoch_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_parse_datagram_minimal_defaults_to_now() {
        let before = epoch_millis_now();
        let fix = parse_datagram(br#"{"latitude": 1.0, "longitude": 2.0}"#).unwrap();
        let after = epoch_millis_now();

        assert_eq!(fix.speed_mps, None);
        assert_eq!(fix.heading_deg, None);
        assert!(fix.captured_at_epoch_ms >= before);
        assert!(fix.captured_at_epoch_ms <= after);
    }

    #[test]
    fn test_parse_datagram_ignores_extra_fields() {
        let json = br#"{
            "latitude": 1.0,
            "longitude": 2.0,
            "provider": "fused",
            "satellites": 11
        }"#;
        assert!(parse_datagram(json).is_ok());
    }

    #[test]
    fn test_parse_datagram_rejects_garbage() {
        assert!(parse_datagram(b"not json").is_err());
        assert!(parse_datagram(br#"{"longitude": 2.0}"#).is_err());
    }

    #[tokio::test]
    async fn test_is_capturing_false_before_begin() {
        let source = UdpLocationSource::with_defaults();
        assert!(!source.is_capturing());
    }

    #[tokio::test]
    async fn test_end_capture_without_begin_is_noop() {
        let source = UdpLocationSource::with_defaults();
        source.end_capture().await;
        assert!(!source.is_capturing());
    }

    #[tokio::test]
    async fn test_begin_and_end_capture() {
        let config = CaptureConfig {
            port: 0, // OS-assigned, avoids collisions across tests
            ..CaptureConfig::default()
        };
        let source = UdpLocationSource::new(config);

        let handler: FixHandler = Arc::new(|_fix| {});
        source.begin_capture(handler).await.unwrap();
        assert!(source.is_capturing());

        source.end_capture().await;
        assert!(!source.is_capturing());
    }

    #[tokio::test]
    async fn test_begin_capture_twice_keeps_one_registration() {
        let config = CaptureConfig {
            port: 0,
            ..CaptureConfig::default()
        };
        let source = UdpLocationSource::new(config);
        let deliveries = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&deliveries);
        let handler: FixHandler = Arc::new(move |_fix| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        source.begin_capture(handler.clone()).await.unwrap();
        source.begin_capture(handler).await.unwrap();
        assert!(source.is_capturing());

        source.end_capture().await;
        assert!(!source.is_capturing());
        // Second end is still safe.
        source.end_capture().await;
    }

    #[tokio::test]
    async fn test_timestamps_clamped_non_decreasing() {
        let config = CaptureConfig {
            port: 0,
            // No throttling so every datagram is delivered.
            interval: Duration::ZERO,
            ..CaptureConfig::default()
        };
        let source = UdpLocationSource::new(config);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: FixHandler = Arc::new(move |fix| {
            sink.lock().unwrap().push(fix.captured_at_epoch_ms);
        });
        source.begin_capture(handler).await.unwrap();
        let port = source.bound_port().unwrap();

        let daemon = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        for ts in [1_000i64, 900, 1_100] {
            let datagram =
                format!(r#"{{"latitude": 1.0, "longitude": 2.0, "timestamp": {ts}}}"#);
            daemon
                .send_to(datagram.as_bytes(), ("127.0.0.1", port))
                .await
                .unwrap();
            // Keep the daemon's send order identical to arrival order.
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        for _ in 0..200 {
            if seen.lock().unwrap().len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        source.end_capture().await;

        // The stepped-back daemon clock is clamped to the last delivered
        // timestamp; later fixes pass through untouched.
        assert_eq!(*seen.lock().unwrap(), vec![1_000, 1_000, 1_100]);
    }

    #[tokio::test]
    async fn test_permissions_always_granted() {
        let source = UdpLocationSource::with_defaults();
        assert!(source.request_permissions().await);
        assert!(source.request_permissions().await);
    }
}
