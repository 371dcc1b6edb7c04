//! Status command implementation
//!
//! Print the reconciled status of every managed file with badges.

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;

use chamois_chezmoi::{Runner, collect_file_states};
use chamois_core::FileStatus;

use crate::cmd::{Command, RuntimeContext};

/// Status command arguments
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Also show clean files
    #[arg(short, long)]
    pub all: bool,
}

impl Command for StatusCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        run_impl(&context.runner, self.all)
    }
}

fn run_impl(runner: &dyn Runner, all: bool) -> Result<()> {
    let files = collect_file_states(runner).context("Failed to list file statuses")?;

    if files.is_empty() {
        println!("No managed files found.");
        return Ok(());
    }

    let modified = files.iter().filter(|f| !f.is_clean()).count();
    let clean = files.len() - modified;
    println!();
    println!(
        "  {} {} {} {} {} {}",
        files.len().to_string().bold(),
        "all".dimmed(),
        modified.to_string().yellow().bold(),
        "modified".dimmed(),
        clean.to_string().green().bold(),
        "clean".dimmed(),
    );
    println!();

    for file in &files {
        if file.is_clean() && !all {
            continue;
        }
        if file.is_clean() {
            println!("  {}", file.path.dimmed());
        } else {
            println!("  {}{}", file.path, badges(file));
        }
    }
    println!();

    Ok(())
}

/// Render the badge suffix for one row.
fn badges(file: &FileStatus) -> String {
    let mut out = String::new();
    if let Some(label) = file.local.label() {
        out.push_str(&format!(" {}", format!("● {label}").green()));
    }
    if let Some(label) = file.index.label() {
        out.push_str(&format!(" {}", format!("~ {label}").blue()));
    }
    if let Some(label) = file.worktree.label() {
        out.push_str(&format!(" {}", format!("~ {label}").yellow()));
    }
    if file.ahead > 0 {
        out.push_str(&format!(" {}", format!("↑ {} ahead", file.ahead).cyan()));
    }
    if file.behind > 0 {
        out.push_str(&format!(" {}", format!("↓ {} behind", file.behind).magenta()));
    }
    out
}
