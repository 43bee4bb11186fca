//! Probe command - one-shot receiver connectivity check.

use driverlink::config::SharedEndpoints;
use driverlink::stream::ConnectivityProbe;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the probe command.
pub fn run() -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("probe");
    let config = runner.config();

    let endpoints = SharedEndpoints::new(config.endpoints.clone());
    let receiver_url = endpoints.receiver_url();
    let probe = ConnectivityProbe::new(endpoints)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("Failed to create async runtime: {}", e)))?;

    println!("Probing receiver at {}...", receiver_url);
    let status = runtime.block_on(probe.check_connection());

    if status.connected {
        println!("Receiver is reachable.");
        if let Some(diagnostics) = status.diagnostics {
            println!();
            println!("Receiver diagnostics:");
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", diagnostics),
            }
        }
        Ok(())
    } else {
        Err(CliError::Unreachable { url: receiver_url })
    }
}
