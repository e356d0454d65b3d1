//! Command line front end: one subcommand per console screen.
//!
//! Each command builds the screen's view controller over an [`HttpRemote`],
//! drives it the way the UI would (mount, search, header clicks, dialog
//! submit) and prints what the screen would show.

pub mod copilot;
pub mod dashboard;
pub mod inventory;
pub mod logs;
pub mod shipping;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::logging;
use crate::remote::{HttpRemote, InventoryRemote};

#[derive(Parser, Debug)]
#[command(
    name = "voltstock",
    version,
    about = "VoltStock inventory and shipping console",
    long_about = None
)]
pub struct Cli {
    /// Inventory service base URL (overrides VOLTSTOCK_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides VOLTSTOCK_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inventory table: list, add, edit, delete, bulk adjust, export.
    #[command(subcommand)]
    Inventory(inventory::InventoryCommand),
    /// Inbound and outbound movement logs with 30-day totals.
    Logs(logs::LogsArgs),
    /// Orders awaiting shipment.
    #[command(subcommand)]
    Orders(shipping::OrdersCommand),
    /// Automatic reorder and shipping rules.
    #[command(subcommand)]
    Automations(shipping::AutomationsCommand),
    /// Headline metrics and the 7-day movement chart.
    Dashboard,
    /// Ask the inventory co-pilot; without a message starts an interactive chat.
    Chat(copilot::ChatArgs),
    /// Version and build information.
    About,
}

/// What every command gets: the service and the output mode.
pub struct Context {
    pub remote: Arc<dyn InventoryRemote>,
    pub json: bool,
}

impl Context {
    pub fn new(config: &ConsoleConfig, json: bool) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api_url, config.timeout)
            .context("Failed to create inventory service client")?;
        debug!(base = api.base_url(), "inventory service client ready");
        Ok(Self {
            remote: Arc::new(HttpRemote::new(api)),
            json,
        })
    }
}

pub async fn execute(command: Command, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Command::Inventory(cmd) => inventory::run(cmd, ctx).await,
        Command::Logs(args) => logs::run(args, ctx).await,
        Command::Orders(cmd) => shipping::run_orders(cmd, ctx).await,
        Command::Automations(cmd) => shipping::run_automations(cmd, ctx).await,
        Command::Dashboard => dashboard::run(ctx).await,
        Command::Chat(args) => copilot::run(args, ctx).await,
        Command::About => {
            let info = logging::about_info();
            if ctx.json {
                print_json(&info)
            } else {
                println!(
                    "VoltStock console v{} ({}, built {}) on {}/{}",
                    info["version"].as_str().unwrap_or_default(),
                    info["gitSha"].as_str().unwrap_or_default(),
                    info["buildTimestamp"].as_str().unwrap_or_default(),
                    info["platform"].as_str().unwrap_or_default(),
                    info["arch"].as_str().unwrap_or_default(),
                );
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{text}");
    Ok(())
}

/// Print a view's blocking notice, if any, to stderr.
pub(crate) fn show_notice(notice: Option<String>) {
    if let Some(message) = notice {
        eprintln!("warning: {message}");
    }
}

/// Plain-text table with left-aligned, space-padded columns.
pub(crate) fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.iter().map(|r| line(r)));
    out.join("\n")
}

/// The delete confirmation prompt. `assume_yes` answers it up front.
pub(crate) async fn confirm(question: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Abandon the view's in-flight requests when the user presses Ctrl-C.
pub(crate) fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}
