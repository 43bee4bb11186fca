//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`probe`] - One-shot receiver connectivity check
//! - [`stream`] - Main command (continuous GPS streaming)

pub mod config;
pub mod probe;
pub mod stream;
