//! Captured output of one external invocation

use serde::{Deserialize, Serialize};

/// The uniform result of every external call.
///
/// Output bytes are decoded lossily; chezmoi and git both emit UTF-8 in
/// practice and a replacement character beats refusing to show anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Whether the process exited successfully
    pub success: bool,
}

impl CommandOutput {
    /// A successful invocation with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// A failed invocation with the given stderr.
    #[must_use]
    pub fn err(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }

    /// The text worth showing: stdout when there is any, stderr otherwise.
    #[must_use]
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}
