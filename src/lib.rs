//! VoltStock console.
//!
//! Client-side engine for the VoltStock inventory service: the table engine
//! (filter, tri-state sort, bulk planner, CSV export), record editors, one
//! view controller per screen that keeps the local collection in sync with
//! the service by reloading after every write, and a command line front end.

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod format;
pub mod logging;
pub mod models;
pub mod remote;
pub mod table;
pub mod views;

#[cfg(test)]
mod test_support;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;

use commands::{Cli, Context};
use config::ConsoleConfig;

// ============================================================================
// App entry point
// ============================================================================

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConsoleConfig::from_env()
        .and_then(|c| c.with_overrides(cli.api_url.as_deref(), cli.timeout))
        .context("Invalid configuration")?;

    // Console + rolling file; the guard flushes the file on exit
    let _log_guard = logging::init(&config.log_dir);

    info!(
        api_url = %config.api_url,
        "Starting VoltStock console v{}",
        env!("CARGO_PKG_VERSION")
    );

    let ctx = Context::new(&config, cli.json)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(commands::execute(cli.command, &ctx))
}
