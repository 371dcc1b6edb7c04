//! Chamois CLI library
//!
//! This library contains all the CLI logic for chamois, making it
//! reusable for testing and integration with other tools.

pub mod cmd;
pub mod config;
pub mod logging;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chamois_chezmoi::ChezmoiRunner;
use cmd::{Command, RuntimeContext};

/// Chamois - a terminal dashboard for chezmoi-managed dotfiles
#[derive(Parser)]
#[command(name = "chamois")]
#[command(about = "See and act on the state of your chezmoi-managed dotfiles")]
#[command(version)]
#[command(long_about = "See and act on the state of your chezmoi-managed dotfiles.

Chamois reconciles three signals for every managed file - local drift,
the source repository's staged/unstaged state, and remote ahead/behind
counts - into one status, and lets you save, restore, stage, commit,
sync, or untrack from a list/diff terminal UI.

Run without a subcommand to open the interactive dashboard.")]
pub struct Cli {
    /// Path to the chezmoi binary (default: resolved from PATH)
    #[arg(long, env = "CHAMOIS_BIN", value_name = "PATH")]
    pub bin: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, env = "CHAMOIS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging the TUI)
    #[arg(long, env = "CHAMOIS_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute; none opens the dashboard
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the chamois CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Show the reconciled status of every managed file
    Status(cmd::status::StatusCommand),

    /// Run chezmoi's diagnostic checks and show them as a table
    Doctor(cmd::doctor::DoctorCommand),

    /// List managed files
    Managed(cmd::managed::ManagedCommand),

    /// Show template data
    Data(cmd::data::DataCommand),

    /// Print the rendered content of a managed file
    Cat(cmd::cat::CatCommand),
}

/// Run the CLI with parsed arguments
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the chezmoi binary
/// cannot be resolved, or the selected command fails.
pub fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;

    // In dashboard mode the terminal belongs to the UI, so logs may only
    // go to a file.
    logging::init(cli.verbose, cli.log_file.as_deref(), cli.command.is_none())?;

    let runner = match cli.bin.clone().or_else(|| config.bin.clone()) {
        Some(bin) => ChezmoiRunner::with_binary(bin),
        None => ChezmoiRunner::new()
            .context("chezmoi not found on PATH; install chezmoi or pass --bin")?,
    };

    let context = RuntimeContext { config, runner };

    match cli.command {
        None => ui::run(&context.runner, &context.config),
        Some(Commands::Status(c)) => c.execute(&context),
        Some(Commands::Doctor(c)) => c.execute(&context),
        Some(Commands::Managed(c)) => c.execute(&context),
        Some(Commands::Data(c)) => c.execute(&context),
        Some(Commands::Cat(c)) => c.execute(&context),
    }
}
