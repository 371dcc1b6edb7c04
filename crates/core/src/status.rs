//! Three-axis status model for managed files
//!
//! Every managed file carries three independent signals: drift between the
//! rendered filesystem copy and the managed source of truth, the staged
//! (index) state of its source file, and the unstaged (worktree) state.
//! Remote divergence is carried alongside as ahead/behind commit counts.
//! Classification is total: any raw code, in any combination, produces a
//! deterministic status.

use serde::{Deserialize, Serialize};

/// Drift between the rendered filesystem state and the managed source.
///
/// Raw codes come from the first column of `chezmoi status` output:
/// `A` added, `D` deleted, `M` modified, `R` renamed, space for no drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalChange {
    /// No drift
    #[default]
    None,
    /// File exists locally but not yet in the source
    Added,
    /// File was deleted locally
    Deleted,
    /// File content differs from the source
    Modified,
    /// File was renamed locally
    Renamed,
}

impl LocalChange {
    /// Classify a raw status code. Unknown codes classify as no drift.
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            'A' => Self::Added,
            'D' => Self::Deleted,
            'M' => Self::Modified,
            'R' => Self::Renamed,
            _ => Self::None,
        }
    }

    /// Badge label, or `None` when there is nothing to show.
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Added => Some("new"),
            Self::Deleted => Some("deleted"),
            Self::Modified => Some("modified"),
            Self::Renamed => Some("renamed"),
        }
    }
}

/// Staged (index) state of the source file in the dotfiles repository.
///
/// Raw codes come from column 1 of `git status --porcelain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    /// Nothing staged
    #[default]
    None,
    /// New file staged
    Added,
    /// Modification staged
    Modified,
    /// Deletion staged
    Deleted,
    /// Any other porcelain code, carried verbatim
    Other(char),
}

impl IndexState {
    /// Classify a raw porcelain index code.
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            ' ' => Self::None,
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            other => Self::Other(other),
        }
    }

    /// Badge label, or `None` when nothing is staged.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Added => Some("staged:new".to_string()),
            Self::Modified => Some("staged:mod".to_string()),
            Self::Deleted => Some("staged:del".to_string()),
            Self::Other(code) => Some(format!("staged:{code}")),
        }
    }
}

/// Unstaged (worktree) state of the source file in the dotfiles repository.
///
/// Raw codes come from column 2 of `git status --porcelain`; `?` means the
/// source file is untracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorktreeState {
    /// No unstaged change
    #[default]
    None,
    /// Unstaged modification
    Modified,
    /// Unstaged deletion
    Deleted,
    /// Source file is untracked
    Untracked,
    /// Any other porcelain code, carried verbatim
    Other(char),
}

impl WorktreeState {
    /// Classify a raw porcelain worktree code.
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            ' ' => Self::None,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            '?' => Self::Untracked,
            other => Self::Other(other),
        }
    }

    /// Badge label.
    ///
    /// Untracked deliberately shows no badge even though it is not `None`:
    /// an untracked source file is not actionable the way a modification is.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::None | Self::Untracked => None,
            Self::Modified => Some("unstaged".to_string()),
            Self::Deleted => Some("unstaged:del".to_string()),
            Self::Other(code) => Some(format!("unstaged:{code}")),
        }
    }
}

/// Full reconciled status of one managed file.
///
/// Rebuilt wholesale on every load; a snapshot is never patched in place.
/// The ahead/behind counts are fleet-wide but carried per file so every
/// row renders uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    /// Path relative to the destination directory, e.g. `.bashrc`
    pub path: String,
    /// Local drift axis
    pub local: LocalChange,
    /// Staged axis
    pub index: IndexState,
    /// Unstaged axis
    pub worktree: WorktreeState,
    /// Commits not yet pushed to the upstream
    pub ahead: u32,
    /// Commits on the upstream not yet pulled
    pub behind: u32,
}

impl FileStatus {
    /// A file with no drift anywhere, used as a building block.
    #[must_use]
    pub fn clean(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            local: LocalChange::None,
            index: IndexState::None,
            worktree: WorktreeState::None,
            ahead: 0,
            behind: 0,
        }
    }

    /// True iff every axis is at its identity value and both commit
    /// counters are zero. Derived on demand, never stored.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.local == LocalChange::None
            && self.index == IndexState::None
            && self.worktree == WorktreeState::None
            && self.ahead == 0
            && self.behind == 0
    }

    /// True when the file has local drift worth diffing.
    #[must_use]
    pub fn has_local_change(&self) -> bool {
        self.local != LocalChange::None
    }

    /// True when the source file has an unstaged change worth diffing or
    /// staging. Untracked does not count.
    #[must_use]
    pub fn has_unstaged_change(&self) -> bool {
        !matches!(self.worktree, WorktreeState::None | WorktreeState::Untracked)
    }

    /// True when anything is staged for commit.
    #[must_use]
    pub fn has_staged_change(&self) -> bool {
        self.index != IndexState::None
    }
}

/// Which files the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every managed file
    All,
    /// Files that are not clean
    #[default]
    Modified,
    /// Clean files only
    Clean,
}

impl FilterMode {
    /// Whether a file is visible under this filter.
    #[must_use]
    pub fn matches(&self, file: &FileStatus) -> bool {
        match self {
            Self::All => true,
            Self::Modified => !file.is_clean(),
            Self::Clean => file.is_clean(),
        }
    }

    /// The next filter in display order.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Modified,
            Self::Modified => Self::Clean,
            Self::Clean => Self::All,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Modified => "modified",
            Self::Clean => "clean",
        }
    }
}

/// Look up a file by its path key in a snapshot.
///
/// The active diff target is re-resolved through this on every decision
/// point rather than captured at transition time, so a target that was
/// untracked or renamed under an open diff simply stops resolving.
#[must_use]
pub fn find_path<'a>(files: &'a [FileStatus], path: &str) -> Option<&'a FileStatus> {
    files.iter().find(|f| f.path == path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn dirty_local(path: &str) -> FileStatus {
        FileStatus {
            local: LocalChange::Modified,
            ..FileStatus::clean(path)
        }
    }

    #[test]
    fn test_is_clean_requires_every_axis_at_identity() {
        // Walk all 32 on/off combinations of the five axes; only the
        // all-identity corner is clean.
        for bits in 0..32u8 {
            let file = FileStatus {
                path: ".bashrc".to_string(),
                local: if bits & 1 != 0 {
                    LocalChange::Modified
                } else {
                    LocalChange::None
                },
                index: if bits & 2 != 0 {
                    IndexState::Modified
                } else {
                    IndexState::None
                },
                worktree: if bits & 4 != 0 {
                    WorktreeState::Modified
                } else {
                    WorktreeState::None
                },
                ahead: u32::from(bits & 8 != 0),
                behind: u32::from(bits & 16 != 0),
            };
            assert_eq!(
                file.is_clean(),
                bits == 0,
                "combination {bits:#07b} misclassified"
            );
        }
    }

    #[test]
    fn test_untracked_worktree_is_not_clean() {
        let file = FileStatus {
            worktree: WorktreeState::Untracked,
            ..FileStatus::clean(".vimrc")
        };
        assert!(!file.is_clean());
        // But it is not an unstaged change either.
        assert!(!file.has_unstaged_change());
    }

    #[test]
    fn test_local_change_classification_is_total() {
        assert_eq!(LocalChange::from_code('A'), LocalChange::Added);
        assert_eq!(LocalChange::from_code('D'), LocalChange::Deleted);
        assert_eq!(LocalChange::from_code('M'), LocalChange::Modified);
        assert_eq!(LocalChange::from_code('R'), LocalChange::Renamed);
        assert_eq!(LocalChange::from_code(' '), LocalChange::None);
        // Unknown codes never reject
        assert_eq!(LocalChange::from_code('Z'), LocalChange::None);
        assert_eq!(LocalChange::from_code('?'), LocalChange::None);
    }

    #[test]
    fn test_porcelain_classification_is_total() {
        assert_eq!(IndexState::from_code('A'), IndexState::Added);
        assert_eq!(IndexState::from_code('U'), IndexState::Other('U'));
        assert_eq!(WorktreeState::from_code('?'), WorktreeState::Untracked);
        assert_eq!(WorktreeState::from_code('T'), WorktreeState::Other('T'));
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(LocalChange::Added.label(), Some("new"));
        assert_eq!(LocalChange::Deleted.label(), Some("deleted"));
        assert_eq!(LocalChange::Modified.label(), Some("modified"));
        assert_eq!(LocalChange::Renamed.label(), Some("renamed"));
        assert_eq!(LocalChange::None.label(), None);

        assert_eq!(IndexState::Added.label().unwrap(), "staged:new");
        assert_eq!(IndexState::Modified.label().unwrap(), "staged:mod");
        assert_eq!(IndexState::Deleted.label().unwrap(), "staged:del");
        assert_eq!(IndexState::Other('U').label().unwrap(), "staged:U");
        assert_eq!(IndexState::None.label(), None);

        assert_eq!(WorktreeState::Modified.label().unwrap(), "unstaged");
        assert_eq!(WorktreeState::Deleted.label().unwrap(), "unstaged:del");
        assert_eq!(WorktreeState::Other('T').label().unwrap(), "unstaged:T");
        assert_eq!(WorktreeState::None.label(), None);
    }

    #[test]
    fn test_untracked_shows_no_unstaged_badge() {
        assert_eq!(WorktreeState::Untracked.label(), None);
    }

    #[test]
    fn test_filter_matches() {
        let clean = FileStatus::clean(".profile");
        let dirty = dirty_local(".bashrc");

        assert!(FilterMode::All.matches(&clean));
        assert!(FilterMode::All.matches(&dirty));
        assert!(FilterMode::Modified.matches(&dirty));
        assert!(!FilterMode::Modified.matches(&clean));
        assert!(FilterMode::Clean.matches(&clean));
        assert!(!FilterMode::Clean.matches(&dirty));
    }

    #[test]
    fn test_filter_cycle_covers_all_modes() {
        let start = FilterMode::Modified;
        let mut mode = start;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(mode);
            mode = mode.cycle();
        }
        assert_eq!(mode, start);
        assert!(seen.contains(&FilterMode::All));
        assert!(seen.contains(&FilterMode::Clean));
    }

    #[test]
    fn test_find_path() {
        let files = vec![FileStatus::clean(".bashrc"), dirty_local(".vimrc")];
        assert_eq!(find_path(&files, ".vimrc").unwrap().path, ".vimrc");
        assert!(find_path(&files, ".zshrc").is_none());
    }
}
