//! kea-config library crate
//!
//! This library exposes the CLI entry point and its modules for the
//! kea-config binary, so integration tests can drive commands against a
//! store they own.

pub mod cli;
pub mod tracing_setup;

use anyhow::Result;
use std::process::ExitCode;

/// Main entry point for kea-config.
///
/// Parses command line arguments, opens the configuration store and runs
/// the requested command.
pub async fn run() -> Result<ExitCode> {
    cli::run().await
}
