//! Doctor command implementation
//!
//! Run chezmoi's diagnostic checks and print them as a table, falling
//! back to the raw report when it does not parse.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use chamois_chezmoi::Runner;
use chamois_core::{DoctorRow, Severity, parse_doctor_report};

use crate::cmd::{Command, RuntimeContext};

/// Doctor command arguments
#[derive(Debug, Args)]
pub struct DoctorCommand {}

impl Command for DoctorCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let out = context
            .runner
            .doctor()
            .context("Failed to run diagnostics")?;

        let text = out.text();
        let rows = parse_doctor_report(text);

        if rows.is_empty() {
            // Nothing parsed; the raw report is still worth showing.
            if text.trim().is_empty() {
                println!("No diagnostic output.");
            } else {
                println!("{text}");
            }
            return Ok(());
        }

        println!("{}", render_table(&rows));
        Ok(())
    }
}

fn render_table(rows: &[DoctorRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Result", "Check", "Message"]);

    for row in rows {
        let color = match row.severity() {
            Severity::Ok => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::Info => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(&row.result).fg(color),
            Cell::new(&row.check),
            Cell::new(&row.message),
        ]);
    }

    table
}
