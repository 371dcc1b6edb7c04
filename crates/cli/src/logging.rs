//! Logging configuration for the chamois CLI
//!
//! Terminal output and optional file logging using tracing. In dashboard
//! mode the terminal is occupied by the UI, so only file logging is
//! available there.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging
/// * `log_file` - Optional path to write logs to a file
/// * `tui` - Dashboard mode; suppresses the stdout layer
///
/// # Errors
///
/// Returns an error if the log filter cannot be built or the log file
/// cannot be opened.
pub fn init(verbose: bool, log_file: Option<&Path>, tui: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    // Allows overriding with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "chamois={level},chamois_core={level},chamois_chezmoi={level}"
            ))
        })
        .context("failed to create default env filter")?;

    match (tui, log_file) {
        (true, Some(log_path)) => {
            let file = open_log_file(log_path)?;
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(file_layer).init();
        }
        (true, None) => {
            // No destination; leave tracing as a no-op.
        }
        (false, Some(log_path)) => {
            let stdout_layer = fmt::layer()
                .with_target(false)
                .without_time()
                .compact()
                .with_ansi(true)
                .with_filter(env_filter);

            let file = open_log_file(log_path)?;
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(
                    EnvFilter::try_new("debug").context("'debug' is a valid filter")?,
                );

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .init();
        }
        (false, None) => {
            let stdout_layer = fmt::layer()
                .with_target(false)
                .without_time()
                .compact()
                .with_ansi(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(stdout_layer).init();
        }
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
