//! DriverLink CLI - Command-line interface
//!
//! This binary provides a command-line interface to the DriverLink library.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use commands::config::ConfigCommands;
use commands::stream::StreamArgs;

#[derive(Parser)]
#[command(name = "driverlink")]
#[command(about = "Stream GPS telemetry to the fleet receiver", long_about = None)]
#[command(version = driverlink::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream GPS fixes from the positioning daemon to the receiver
    Stream(StreamArgs),

    /// Check receiver connectivity and show its diagnostics
    Probe,

    /// Manage configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stream(args) => commands::stream::run(args),
        Commands::Probe => commands::probe::run(),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
