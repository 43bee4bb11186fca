//! Stream command - continuous GPS streaming to the receiver.
//!
//! Wires the full pipeline: UDP location source -> stream session ->
//! telemetry publisher -> receiver `/gps`, plus a background connectivity
//! monitor reporting receiver reachability transitions.

use std::time::Duration;

use driverlink::config::SharedEndpoints;
use driverlink::stream::{
    CaptureConfig, ConnectivityMonitor, ConnectivityProbe, HttpIngestClient, StreamSession,
    TelemetryPublisher, UdpLocationSource, DEFAULT_PROBE_INTERVAL,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the stream command.
#[derive(Debug, clap::Args)]
pub struct StreamArgs {
    /// Receiver base URL (overrides endpoints.receiver_url from config)
    #[arg(long)]
    pub receiver: Option<String>,

    /// UDP port the positioning daemon sends fixes to (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Minimum interval between published fixes in ms (overrides config)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Run the stream command.
pub fn run(args: StreamArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("stream");
    let config = runner.config();

    let endpoints = SharedEndpoints::new(config.endpoints.clone());
    if let Some(ref url) = args.receiver {
        endpoints.set_receiver_url(url);
    }

    let mut capture = CaptureConfig::from(&config.capture);
    if let Some(port) = args.port {
        capture.port = port;
    }
    if let Some(interval_ms) = args.interval_ms {
        capture.interval = Duration::from_millis(interval_ms);
    }

    println!("DriverLink v{}", driverlink::VERSION);
    println!("{}", "=".repeat(40));
    println!();
    println!("Receiver:     {}", endpoints.receiver_url());
    println!("UDP port:     {}", capture.port);
    println!("Fix interval: {} ms", capture.interval.as_millis());
    println!();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(run_session(endpoints, capture))
}

async fn run_session(endpoints: SharedEndpoints, capture: CaptureConfig) -> Result<(), CliError> {
    let source = UdpLocationSource::new(capture);
    let client = HttpIngestClient::new()?;
    let publisher = TelemetryPublisher::new(client, endpoints.clone());
    let session = StreamSession::new(source, publisher);

    session.start().await?;
    println!("Streaming started. Press Ctrl+C to stop.");
    println!();

    // Watch receiver reachability in the background and report transitions.
    let probe = ConnectivityProbe::new(endpoints)?;
    let monitor = ConnectivityMonitor::with_interval(probe, DEFAULT_PROBE_INTERVAL);
    let (mut status_rx, monitor_cancel) = monitor.start();
    let status_task = tokio::spawn(async move {
        let mut last_connected: Option<bool> = None;
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow().clone();
            if last_connected != Some(status.connected) {
                if status.connected {
                    println!("Receiver reachable.");
                } else {
                    println!("Receiver unreachable, fixes will be dropped.");
                }
                last_connected = Some(status.connected);
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| CliError::Config(format!("Failed to listen for Ctrl+C: {}", e)))?;

    println!();
    println!("Stopping...");
    session.stop().await;
    monitor_cancel.cancel();
    status_task.abort();

    println!(
        "Session ended: {} fixes delivered, {} dropped.",
        session.publisher().delivered(),
        session.publisher().dropped()
    );

    Ok(())
}
