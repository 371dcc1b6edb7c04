//! CLI command implementations
//!
//! All plain-print subcommands implement the [`Command`] trait so they
//! execute uniformly against a shared [`RuntimeContext`].

pub mod cat;
pub mod data;
pub mod doctor;
pub mod managed;
pub mod status;

use anyhow::Result;
use chamois_chezmoi::ChezmoiRunner;

use crate::config::Config;

/// Runtime context shared by all commands.
pub struct RuntimeContext {
    /// Loaded configuration
    pub config: Config,
    /// Process-backed command runner
    pub runner: ChezmoiRunner,
}

/// Trait for all chamois commands
///
/// Commands receive a [`RuntimeContext`] containing the configuration and
/// the resolved runner, and can specify their return type via the
/// `Output` associated type.
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails to execute.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
