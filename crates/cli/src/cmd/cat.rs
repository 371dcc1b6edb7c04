//! Cat command implementation
//!
//! Print the rendered content of one managed file, as chezmoi would
//! apply it.

use anyhow::{Context, Result};
use clap::Args;

use crate::cmd::{Command, RuntimeContext};
use chamois_chezmoi::Runner;

/// Cat command arguments
#[derive(Debug, Args)]
pub struct CatCommand {
    /// Managed path to print (relative to home, or absolute)
    pub path: String,
}

impl Command for CatCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let out = context
            .runner
            .cat(&self.path)
            .context("Failed to render file")?;

        if !out.success {
            anyhow::bail!("{}", out.stderr.trim());
        }
        print!("{}", out.stdout);
        Ok(())
    }
}
