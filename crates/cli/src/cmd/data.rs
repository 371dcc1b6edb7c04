//! Data command implementation
//!
//! Show the template data chezmoi exposes, pretty-printed when it parses
//! as JSON, raw otherwise.

use anyhow::{Context, Result};
use clap::Args;

use crate::cmd::{Command, RuntimeContext};
use chamois_chezmoi::Runner;

/// Data command arguments
#[derive(Debug, Args)]
pub struct DataCommand {}

impl Command for DataCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let out = context
            .runner
            .data()
            .context("Failed to read template data")?;

        match serde_json::from_str::<serde_json::Value>(&out.stdout) {
            Ok(value) => {
                let pretty = serde_json::to_string_pretty(&value)
                    .context("Failed to format template data")?;
                println!("{pretty}");
            }
            Err(_) => {
                // Not JSON; show whatever the tool said.
                println!("{}", out.text());
            }
        }
        Ok(())
    }
}
