//! Snapshot collection
//!
//! One snapshot is the composition of four external calls: the managed
//! path universe, per-path local drift, the source repository's porcelain
//! status, and the fleet-wide ahead/behind counts. Each load rebuilds the
//! whole snapshot from scratch; nothing is patched incrementally.

use std::collections::HashMap;

use chamois_core::{FileStatus, IndexState, LocalChange, WorktreeState};

use crate::error::Result;
use crate::runner::Runner;

/// Collect the full reconciled status of every managed file.
///
/// An empty managed list short-circuits: no further external calls are
/// made. A failed rev-list (typically: no upstream configured) degrades
/// to zero ahead/behind rather than failing the load.
///
/// # Errors
///
/// Returns an error only when one of the required external commands could
/// not be spawned at all.
pub fn collect_file_states(runner: &dyn Runner) -> Result<Vec<FileStatus>> {
    let managed_out = runner.managed()?;
    let managed: Vec<&str> = managed_out
        .stdout
        .lines()
        .filter(|line| !line.is_empty())
        .collect();
    if managed.is_empty() {
        return Ok(Vec::new());
    }

    let status_out = runner.status()?;
    let local_changes = parse_status_lines(&status_out.stdout);

    let porcelain_out = runner.git(&["status", "--porcelain"])?;
    let repo_states = parse_porcelain(&porcelain_out.stdout);

    let (ahead, behind) = match runner.git(&[
        "rev-list",
        "--left-right",
        "--count",
        "HEAD...@{upstream}",
    ]) {
        Ok(out) if out.success => parse_ahead_behind(&out.stdout),
        _ => (0, 0),
    };

    Ok(managed
        .into_iter()
        .map(|path| {
            let local = local_changes
                .get(path)
                .copied()
                .map(LocalChange::from_code)
                .unwrap_or_default();

            let source_name = source_name_for(path);
            let (index, worktree) = repo_states
                .get(source_name.as_str())
                .or_else(|| {
                    let base = source_name.rsplit('/').next().unwrap_or(&source_name);
                    repo_states.get(base)
                })
                .copied()
                .unwrap_or((' ', ' '));

            FileStatus {
                path: path.to_string(),
                local,
                index: IndexState::from_code(index),
                worktree: WorktreeState::from_code(worktree),
                ahead,
                behind,
            }
        })
        .collect())
}

/// Parse `chezmoi status` output: two status columns, a space, the path.
fn parse_status_lines(stdout: &str) -> HashMap<&str, char> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let code = line.chars().next()?;
            let path = line.get(3..)?;
            Some((path, code))
        })
        .collect()
}

/// Parse `git status --porcelain` output into `(index, worktree)` code
/// pairs, keyed by both the full porcelain path and its basename. The
/// basename key covers source layouts where the porcelain path carries a
/// directory prefix the target-name heuristic cannot predict.
fn parse_porcelain(stdout: &str) -> HashMap<String, (char, char)> {
    let mut states = HashMap::new();
    for line in stdout.lines().filter(|line| !line.is_empty()) {
        let mut chars = line.chars();
        let (Some(index), Some(worktree)) = (chars.next(), chars.next()) else {
            continue;
        };
        let Some(filename) = line.get(3..) else {
            continue;
        };
        if let Some(base) = filename.rsplit('/').next() {
            states.insert(base.to_string(), (index, worktree));
        }
        states.insert(filename.to_string(), (index, worktree));
    }
    states
}

/// Parse `git rev-list --left-right --count` output: "AHEAD\tBEHIND".
fn parse_ahead_behind(stdout: &str) -> (u32, u32) {
    let mut parts = stdout.split_whitespace();
    let ahead = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let behind = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (ahead, behind)
}

/// Convert a target path (relative to home) to its likely source name
/// using chezmoi's naming convention: a leading dot on the first
/// component becomes a `dot_` prefix.
fn source_name_for(path: &str) -> String {
    let mut parts = path.splitn(2, '/');
    let first = parts.next().unwrap_or(path);
    let converted = match first.strip_prefix('.') {
        Some(stripped) => format!("dot_{stripped}"),
        None => first.to_string(),
    };
    match parts.next() {
        Some(rest) => format!("{converted}/{rest}"),
        None => converted,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::output::CommandOutput;
    use std::cell::RefCell;
    use std::collections::HashMap as CallMap;

    /// Scripted runner: fixed outputs per operation, with call counting.
    #[derive(Default)]
    struct FakeRunner {
        managed: String,
        status: String,
        porcelain: String,
        rev_list: Option<CommandOutput>,
        calls: RefCell<CallMap<&'static str, usize>>,
    }

    impl FakeRunner {
        fn count(&self, op: &'static str) {
            *self.calls.borrow_mut().entry(op).or_insert(0) += 1;
        }

        fn calls(&self, op: &str) -> usize {
            self.calls.borrow().get(op).copied().unwrap_or(0)
        }
    }

    impl Runner for FakeRunner {
        fn managed(&self) -> Result<CommandOutput> {
            self.count("managed");
            Ok(CommandOutput::ok(self.managed.clone()))
        }
        fn status(&self) -> Result<CommandOutput> {
            self.count("status");
            Ok(CommandOutput::ok(self.status.clone()))
        }
        fn diff(&self, _path: Option<&str>) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn diff_source(&self, _source_path: &str) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn apply(&self, _path: Option<&str>) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn add(&self, _path: &str) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn forget(&self, _path: &str) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn git(&self, args: &[&str]) -> Result<CommandOutput> {
            match args.first() {
                Some(&"status") => {
                    self.count("git-status");
                    Ok(CommandOutput::ok(self.porcelain.clone()))
                }
                Some(&"rev-list") => {
                    self.count("rev-list");
                    Ok(self
                        .rev_list
                        .clone()
                        .unwrap_or_else(|| CommandOutput::ok("0\t0\n")))
                }
                _ => Ok(CommandOutput::ok("")),
            }
        }
        fn data(&self) -> Result<CommandOutput> {
            Ok(CommandOutput::ok("{}"))
        }
        fn doctor(&self) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn source_path(&self, _path: Option<&str>) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
        fn cat(&self, _path: &str) -> Result<CommandOutput> {
            Ok(CommandOutput::ok(""))
        }
    }

    #[test]
    fn test_collect_composes_all_signals() {
        let runner = FakeRunner {
            managed: ".bashrc\n.vimrc\n".to_string(),
            status: "M  .bashrc\n".to_string(),
            porcelain: " M dot_bashrc\n".to_string(),
            rev_list: Some(CommandOutput::ok("2\t1\n")),
            ..FakeRunner::default()
        };

        let files = collect_file_states(&runner).unwrap();
        assert_eq!(files.len(), 2);

        let bashrc = &files[0];
        assert_eq!(bashrc.path, ".bashrc");
        assert_eq!(bashrc.local, LocalChange::Modified);
        assert_eq!(bashrc.index, IndexState::None);
        assert_eq!(bashrc.worktree, WorktreeState::Modified);
        assert_eq!((bashrc.ahead, bashrc.behind), (2, 1));

        let vimrc = &files[1];
        assert_eq!(vimrc.local, LocalChange::None);
        assert_eq!(vimrc.worktree, WorktreeState::None);
        // Divergence is fleet-wide, carried on every row.
        assert_eq!((vimrc.ahead, vimrc.behind), (2, 1));
    }

    #[test]
    fn test_empty_managed_short_circuits() {
        let runner = FakeRunner::default();
        let files = collect_file_states(&runner).unwrap();
        assert!(files.is_empty());
        assert_eq!(runner.calls("managed"), 1);
        assert_eq!(runner.calls("status"), 0);
        assert_eq!(runner.calls("git-status"), 0);
    }

    #[test]
    fn test_failed_rev_list_degrades_to_zero() {
        let runner = FakeRunner {
            managed: ".bashrc\n".to_string(),
            rev_list: Some(CommandOutput::err(
                "fatal: no upstream configured for branch 'main'",
            )),
            ..FakeRunner::default()
        };
        let files = collect_file_states(&runner).unwrap();
        assert_eq!((files[0].ahead, files[0].behind), (0, 0));
    }

    #[test]
    fn test_untracked_source_file_maps_to_untracked_worktree() {
        let runner = FakeRunner {
            managed: ".zshrc\n".to_string(),
            porcelain: "?? dot_zshrc\n".to_string(),
            ..FakeRunner::default()
        };
        let files = collect_file_states(&runner).unwrap();
        assert_eq!(files[0].index, IndexState::Other('?'));
        assert_eq!(files[0].worktree, WorktreeState::Untracked);
    }

    #[test]
    fn test_basename_fallback_for_prefixed_source_layout() {
        // Porcelain path carries a directory prefix the dot_ heuristic
        // cannot predict; the basename key still matches.
        let runner = FakeRunner {
            managed: ".gitconfig\n".to_string(),
            porcelain: "A  home/dot_gitconfig\n".to_string(),
            ..FakeRunner::default()
        };
        let files = collect_file_states(&runner).unwrap();
        assert_eq!(files[0].index, IndexState::Added);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let runner = FakeRunner {
            managed: ".bashrc\n.config/git/config\n".to_string(),
            status: "A  .config/git/config\n".to_string(),
            porcelain: "M  dot_config/git/config\n".to_string(),
            rev_list: Some(CommandOutput::ok("1\t0\n")),
            ..FakeRunner::default()
        };
        let first = collect_file_states(&runner).unwrap();
        let second = collect_file_states(&runner).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_name_heuristic() {
        assert_eq!(source_name_for(".bashrc"), "dot_bashrc");
        assert_eq!(
            source_name_for(".config/nvim/init.lua"),
            "dot_config/nvim/init.lua"
        );
        assert_eq!(source_name_for("bin/tool"), "bin/tool");
    }

    #[test]
    fn test_parse_status_lines_skips_short_lines() {
        let map = parse_status_lines("M  .bashrc\nX\n\n A .profile\n");
        assert_eq!(map.get(".bashrc"), Some(&'M'));
        assert_eq!(map.get(".profile"), Some(&' '));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_ahead_behind() {
        assert_eq!(parse_ahead_behind("3\t5\n"), (3, 5));
        assert_eq!(parse_ahead_behind("7"), (7, 0));
        assert_eq!(parse_ahead_behind(""), (0, 0));
        assert_eq!(parse_ahead_behind("junk here"), (0, 0));
    }
}
