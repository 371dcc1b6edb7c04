//! chezmoi command-runner boundary
//!
//! chamois never touches the filesystem or the dotfiles repository itself;
//! everything goes through the `chezmoi` binary (and git through chezmoi's
//! `git` passthrough). This crate defines the [`Runner`] capability trait,
//! a process-backed implementation, and the snapshot collector that
//! composes four external calls into classified per-file statuses.

pub mod collect;
pub mod error;
pub mod output;
pub mod runner;

pub use collect::collect_file_states;
pub use error::{Error, Result};
pub use output::CommandOutput;
pub use runner::{ChezmoiRunner, Runner};
