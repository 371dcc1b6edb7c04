//! Legal-action derivation
//!
//! Given the reconciled status of one file (diff context) or a whole
//! snapshot (list context), compute the ordered set of actions the
//! operator may take. The ordering is a usability contract: actions that
//! touch the local machine come before actions that touch the remote.

use crate::status::FileStatus;

/// What an action does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Persist local drift into the managed source
    Save,
    /// Discard local drift by re-applying the managed source
    Restore,
    /// Move an unstaged source change into the index
    Stage,
    /// Open the commit dialog
    Commit,
    /// Push local commits to the upstream
    SyncPush,
    /// Pull upstream commits
    SyncPull,
    /// Remove the file from management
    Untrack,
}

impl ActionKind {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Restore => "restore",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::SyncPush => "push",
            Self::SyncPull => "pull",
            Self::Untrack => "untrack",
        }
    }
}

/// One derived action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    /// What invoking it does
    pub kind: ActionKind,
    /// Display label
    pub label: &'static str,
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Self {
            kind,
            label: kind.label(),
        }
    }
}

/// Which comparison an open diff view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOrigin {
    /// Local filesystem vs managed source
    Local,
    /// Unstaged changes of the source file in the dotfiles repository
    Repo,
}

/// Derive the actions legal in a diff view.
///
/// `file` is the *current* lookup of the diff target in the latest
/// snapshot; `None` means the target vanished under the open diff. Save
/// and restore remain offered for a local-origin diff regardless, since
/// they operate on the captured path rather than the snapshot row; every
/// gated action needs a live row.
#[must_use]
pub fn diff_actions(origin: DiffOrigin, file: Option<&FileStatus>) -> Vec<Action> {
    let mut actions: Vec<Action> = Vec::new();

    match origin {
        DiffOrigin::Local => {
            actions.push(ActionKind::Save.into());
            actions.push(ActionKind::Restore.into());
        }
        DiffOrigin::Repo => {
            if let Some(file) = file
                && file.has_unstaged_change()
            {
                actions.push(ActionKind::Stage.into());
            }
        }
    }

    if let Some(file) = file {
        if file.has_staged_change() {
            actions.push(ActionKind::Commit.into());
        }
        if file.ahead > 0 {
            actions.push(ActionKind::SyncPush.into());
        }
        if file.behind > 0 {
            actions.push(ActionKind::SyncPull.into());
        }
        if file.is_clean() {
            actions.push(ActionKind::Untrack.into());
        }
    }

    actions
}

/// Derive the fleet-wide actions legal in the list view.
///
/// These gates are aggregate: one staged file anywhere enables commit,
/// one ahead/behind count anywhere enables push/pull.
#[must_use]
pub fn list_actions(files: &[FileStatus]) -> Vec<Action> {
    let mut actions: Vec<Action> = Vec::new();
    if any_staged(files) {
        actions.push(ActionKind::Commit.into());
    }
    if any_ahead(files) {
        actions.push(ActionKind::SyncPush.into());
    }
    if any_behind(files) {
        actions.push(ActionKind::SyncPull.into());
    }
    actions
}

/// True when any file has a staged change.
#[must_use]
pub fn any_staged(files: &[FileStatus]) -> bool {
    files.iter().any(FileStatus::has_staged_change)
}

/// True when any file reports unpushed commits.
#[must_use]
pub fn any_ahead(files: &[FileStatus]) -> bool {
    files.iter().any(|f| f.ahead > 0)
}

/// True when any file reports unpulled commits.
#[must_use]
pub fn any_behind(files: &[FileStatus]) -> bool {
    files.iter().any(|f| f.behind > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::status::{IndexState, LocalChange, WorktreeState};

    fn kinds(actions: &[Action]) -> Vec<ActionKind> {
        actions.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_modified_file_local_diff_offers_exactly_save_and_restore() {
        let file = FileStatus {
            local: LocalChange::Modified,
            ..FileStatus::clean("a")
        };
        let actions = diff_actions(DiffOrigin::Local, Some(&file));
        assert_eq!(kinds(&actions), vec![ActionKind::Save, ActionKind::Restore]);
    }

    #[test]
    fn test_no_commit_without_staged_change() {
        let candidates = [
            FileStatus::clean("a"),
            FileStatus {
                local: LocalChange::Added,
                worktree: WorktreeState::Modified,
                ahead: 2,
                behind: 1,
                ..FileStatus::clean("b")
            },
        ];
        for file in &candidates {
            for origin in [DiffOrigin::Local, DiffOrigin::Repo] {
                let actions = diff_actions(origin, Some(file));
                assert!(
                    !kinds(&actions).contains(&ActionKind::Commit),
                    "commit derived for {} without staged change",
                    file.path
                );
            }
        }
    }

    #[test]
    fn test_no_untrack_unless_clean() {
        let dirty = [
            FileStatus {
                local: LocalChange::Modified,
                ..FileStatus::clean("a")
            },
            FileStatus {
                index: IndexState::Added,
                ..FileStatus::clean("b")
            },
            FileStatus {
                worktree: WorktreeState::Untracked,
                ..FileStatus::clean("c")
            },
            FileStatus {
                ahead: 1,
                ..FileStatus::clean("d")
            },
            FileStatus {
                behind: 3,
                ..FileStatus::clean("e")
            },
        ];
        for file in &dirty {
            let actions = diff_actions(DiffOrigin::Local, Some(file));
            assert!(
                !kinds(&actions).contains(&ActionKind::Untrack),
                "untrack derived for unclean {}",
                file.path
            );
        }

        let clean = FileStatus::clean("f");
        let actions = diff_actions(DiffOrigin::Local, Some(&clean));
        assert!(kinds(&actions).contains(&ActionKind::Untrack));
    }

    #[test]
    fn test_repo_diff_stage_gate() {
        let unstaged = FileStatus {
            worktree: WorktreeState::Modified,
            ..FileStatus::clean("a")
        };
        assert_eq!(
            kinds(&diff_actions(DiffOrigin::Repo, Some(&unstaged))),
            vec![ActionKind::Stage]
        );

        // Untracked and no-change both suppress stage.
        let untracked = FileStatus {
            worktree: WorktreeState::Untracked,
            ..FileStatus::clean("b")
        };
        assert!(diff_actions(DiffOrigin::Repo, Some(&untracked)).is_empty());
        let none = FileStatus {
            ahead: 1,
            ..FileStatus::clean("c")
        };
        assert_eq!(
            kinds(&diff_actions(DiffOrigin::Repo, Some(&none))),
            vec![ActionKind::SyncPush]
        );
    }

    #[test]
    fn test_ordering_is_fixed() {
        let file = FileStatus {
            index: IndexState::Modified,
            worktree: WorktreeState::Modified,
            ahead: 1,
            behind: 1,
            ..FileStatus::clean("a")
        };
        assert_eq!(
            kinds(&diff_actions(DiffOrigin::Repo, Some(&file))),
            vec![
                ActionKind::Stage,
                ActionKind::Commit,
                ActionKind::SyncPush,
                ActionKind::SyncPull,
            ]
        );
        assert_eq!(
            kinds(&diff_actions(DiffOrigin::Local, Some(&file))),
            vec![
                ActionKind::Save,
                ActionKind::Restore,
                ActionKind::Commit,
                ActionKind::SyncPush,
                ActionKind::SyncPull,
            ]
        );
    }

    #[test]
    fn test_vanished_target_keeps_only_unconditional_actions() {
        assert_eq!(
            kinds(&diff_actions(DiffOrigin::Local, None)),
            vec![ActionKind::Save, ActionKind::Restore]
        );
        assert!(diff_actions(DiffOrigin::Repo, None).is_empty());
    }

    #[test]
    fn test_list_gates_are_aggregate() {
        let mut files = vec![FileStatus::clean("a"), FileStatus::clean("b")];
        assert!(list_actions(&files).is_empty());

        files.push(FileStatus {
            index: IndexState::Added,
            ..FileStatus::clean("c")
        });
        assert_eq!(kinds(&list_actions(&files)), vec![ActionKind::Commit]);
    }

    #[test]
    fn test_push_gate_is_monotonic() {
        let mut files = vec![FileStatus::clean("a")];
        assert!(!any_ahead(&files));

        // Adding one ahead file flips the gate on.
        files.push(FileStatus {
            ahead: 2,
            ..FileStatus::clean("b")
        });
        assert!(any_ahead(&files));
        assert!(
            kinds(&list_actions(&files)).contains(&ActionKind::SyncPush)
        );

        // Removing the only ahead file flips it back off.
        files.retain(|f| f.ahead == 0);
        assert!(!any_ahead(&files));
        assert!(
            !kinds(&list_actions(&files)).contains(&ActionKind::SyncPush)
        );
    }

    #[test]
    fn test_list_ordering() {
        let files = vec![FileStatus {
            index: IndexState::Modified,
            ahead: 1,
            behind: 1,
            ..FileStatus::clean("a")
        }];
        assert_eq!(
            kinds(&list_actions(&files)),
            vec![ActionKind::Commit, ActionKind::SyncPush, ActionKind::SyncPull]
        );
    }
}
