//! Core status model for chamois
//!
//! This crate holds the pure part of chamois: classifying the three
//! independent signals reported for every managed file (local drift,
//! repository index/worktree state, remote divergence) into a single
//! per-file status, deriving the set of legal actions for a status, and
//! parsing diagnostic reports. No I/O happens here; everything is a total
//! function over data handed in by the command-runner boundary.

pub mod actions;
pub mod doctor;
pub mod status;

pub use actions::{Action, ActionKind, DiffOrigin, diff_actions, list_actions};
pub use doctor::{DoctorRow, Severity, parse_doctor_report};
pub use status::{FileStatus, FilterMode, IndexState, LocalChange, WorktreeState, find_path};
