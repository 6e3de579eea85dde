use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log output goes
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Compact lines on stderr (report subcommands)
    Stderr,
    /// Append to a file; the TUI owns the terminal
    File(PathBuf),
}

/// Initialize the logging system
pub fn init_logger(verbose: bool, target: LogTarget) -> Result<()> {
    // RUST_LOG wins; otherwise info when verbose, warn when quiet
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}
