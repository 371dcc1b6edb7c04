//! The command-runner capability and its process-backed implementation
//!
//! [`Runner`] is the seam the rest of chamois depends on: every operation
//! the UI can trigger maps to one method returning a [`CommandOutput`].
//! [`ChezmoiRunner`] implements it by spawning the chezmoi binary; tests
//! implement it with scripted fakes.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};
use crate::output::CommandOutput;

/// Abstract command-runner capability.
///
/// Implementations may fail to *run* a command (spawn error) but must not
/// turn a command's own failure into an `Err`: a non-zero exit travels
/// back as `CommandOutput { success: false, .. }`.
pub trait Runner {
    /// List managed file paths, newline-delimited, relative to home.
    fn managed(&self) -> Result<CommandOutput>;

    /// Raw `chezmoi status` lines (local drift per path).
    fn status(&self) -> Result<CommandOutput>;

    /// Diff between the destination and the managed source, optionally
    /// narrowed to one path.
    fn diff(&self, path: Option<&str>) -> Result<CommandOutput>;

    /// Unstaged diff of one source file inside the dotfiles repository.
    fn diff_source(&self, source_path: &str) -> Result<CommandOutput>;

    /// Apply the managed source over the destination, optionally narrowed
    /// to one path.
    fn apply(&self, path: Option<&str>) -> Result<CommandOutput>;

    /// Add a destination path to management.
    fn add(&self, path: &str) -> Result<CommandOutput>;

    /// Remove a path from management, leaving the destination file alone.
    fn forget(&self, path: &str) -> Result<CommandOutput>;

    /// Run git inside the source repository via chezmoi's passthrough.
    fn git(&self, args: &[&str]) -> Result<CommandOutput>;

    /// Template data as JSON text.
    fn data(&self) -> Result<CommandOutput>;

    /// Line-oriented diagnostic report.
    fn doctor(&self) -> Result<CommandOutput>;

    /// Resolve the source path for a destination path (or the source
    /// directory itself when no path is given).
    fn source_path(&self, path: Option<&str>) -> Result<CommandOutput>;

    /// Rendered content of one managed file.
    fn cat(&self, path: &str) -> Result<CommandOutput>;
}

impl<T: Runner + ?Sized> Runner for &T {
    fn managed(&self) -> Result<CommandOutput> {
        (**self).managed()
    }
    fn status(&self) -> Result<CommandOutput> {
        (**self).status()
    }
    fn diff(&self, path: Option<&str>) -> Result<CommandOutput> {
        (**self).diff(path)
    }
    fn diff_source(&self, source_path: &str) -> Result<CommandOutput> {
        (**self).diff_source(source_path)
    }
    fn apply(&self, path: Option<&str>) -> Result<CommandOutput> {
        (**self).apply(path)
    }
    fn add(&self, path: &str) -> Result<CommandOutput> {
        (**self).add(path)
    }
    fn forget(&self, path: &str) -> Result<CommandOutput> {
        (**self).forget(path)
    }
    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        (**self).git(args)
    }
    fn data(&self) -> Result<CommandOutput> {
        (**self).data()
    }
    fn doctor(&self) -> Result<CommandOutput> {
        (**self).doctor()
    }
    fn source_path(&self, path: Option<&str>) -> Result<CommandOutput> {
        (**self).source_path(path)
    }
    fn cat(&self, path: &str) -> Result<CommandOutput> {
        (**self).cat(path)
    }
}

/// Process-backed runner that shells out to the chezmoi binary.
#[derive(Debug, Clone)]
pub struct ChezmoiRunner {
    bin: PathBuf,
}

impl ChezmoiRunner {
    /// Resolve `chezmoi` on PATH.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be found.
    pub fn new() -> Result<Self> {
        let bin = which::which("chezmoi")?;
        Ok(Self { bin })
    }

    /// Use an explicit binary path instead of resolving PATH.
    #[must_use]
    pub fn with_binary(bin: PathBuf) -> Self {
        Self { bin }
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                command: format!("{} {}", self.bin.display(), args.join(" ")),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        };
        debug!(?args, success = result.success, "chezmoi");
        Ok(result)
    }

    fn run_git(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut full = vec!["git", "--"];
        full.extend_from_slice(args);
        self.run(&full)
    }
}

impl Runner for ChezmoiRunner {
    fn managed(&self) -> Result<CommandOutput> {
        self.run(&["managed", "--include=files"])
    }

    fn status(&self) -> Result<CommandOutput> {
        self.run(&["status"])
    }

    fn diff(&self, path: Option<&str>) -> Result<CommandOutput> {
        match path {
            Some(p) => self.run(&["diff", &expand_home(p)]),
            None => self.run(&["diff"]),
        }
    }

    fn diff_source(&self, source_path: &str) -> Result<CommandOutput> {
        self.run_git(&["diff", source_path])
    }

    fn apply(&self, path: Option<&str>) -> Result<CommandOutput> {
        match path {
            Some(p) => self.run(&["apply", "--force", &expand_home(p)]),
            None => self.run(&["apply", "--force"]),
        }
    }

    fn add(&self, path: &str) -> Result<CommandOutput> {
        self.run(&["add", &expand_home(path)])
    }

    fn forget(&self, path: &str) -> Result<CommandOutput> {
        self.run(&["forget", "--force", &expand_home(path)])
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run_git(args)
    }

    fn data(&self) -> Result<CommandOutput> {
        self.run(&["data", "--format=json"])
    }

    fn doctor(&self) -> Result<CommandOutput> {
        self.run(&["doctor"])
    }

    fn source_path(&self, path: Option<&str>) -> Result<CommandOutput> {
        match path {
            Some(p) => self.run(&["source-path", &expand_home(p)]),
            None => self.run(&["source-path"]),
        }
    }

    fn cat(&self, path: &str) -> Result<CommandOutput> {
        self.run(&["cat", &expand_home(path)])
    }
}

/// Expand a home-relative managed path (e.g. `.bashrc`) to an absolute
/// path for chezmoi's command line. Absolute and `~/`-prefixed paths pass
/// through untouched.
fn expand_home(path: &str) -> String {
    if path.starts_with('/') || path.starts_with("~/") {
        return path.to_string();
    }
    match dirs::home_dir() {
        Some(home) => format!("{}/{path}", home.display()),
        None => format!("~/{path}"),
    }
}
