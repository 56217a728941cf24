//! A full-screen terminal browser for a Pocket reading list.
//!
//! Run the binary to page through unread items, preview excerpts, and
//! archive, delete, copy, open or mail the selected link.

mod app;
mod config;
mod core;
mod launch;
mod source;
mod ui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{controller::Controller, terminal::CrosstermConsole};
use crate::config::AppConfig;
use crate::launch::SystemLauncher;
use crate::source::pocket::PocketClient;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = "pocket", version, about = "Browse your Pocket reading list in the terminal")]
struct Cli {
    /// Configuration file (defaults to `<config dir>/pocket/config.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Append diagnostics to this file.  Nothing is logged without it,
    /// since the terminal itself is taken over by the screen.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ───────────────────────────────────────── logging ──────────

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Configuration problems are reported before the terminal is touched.
    let config = AppConfig::load(cli.config)?;
    tracing::info!(path = %config.path.display(), endpoint = %config.endpoint, "configuration loaded");

    let source = PocketClient::new(&config).context("cannot build HTTP client")?;
    let console = CrosstermConsole::enter().context("cannot initialise terminal")?;

    let mut controller = Controller::new(console, source, SystemLauncher::new(), config.bindings);
    let result = controller.run();
    // Restore the terminal before any error is printed.
    drop(controller);

    if let Err(err) = &result {
        tracing::error!(error = %err, "session ended with an error");
    }
    result
}
