//! Managed command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::cmd::{Command, RuntimeContext};
use chamois_chezmoi::Runner;

/// Managed command arguments
#[derive(Debug, Args)]
pub struct ManagedCommand {
    /// Only show paths containing this substring (case-insensitive)
    pub filter: Option<String>,
}

impl Command for ManagedCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let out = context
            .runner
            .managed()
            .context("Failed to list managed files")?;

        let needle = self.filter.as_deref().map(str::to_lowercase);
        let paths: Vec<&str> = out
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .filter(|line| match &needle {
                Some(needle) => line.to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        if paths.is_empty() {
            println!("No managed files found.");
            return Ok(());
        }

        for path in paths {
            println!("{path}");
        }
        Ok(())
    }
}
