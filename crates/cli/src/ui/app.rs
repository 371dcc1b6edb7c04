//! The dashboard state machine
//!
//! One [`App`] owns the snapshot and exactly one live [`View`]. Every
//! mutating action goes through the same two-phase protocol: invoke the
//! external operation, set the notice from its outcome, reload the whole
//! snapshot. The snapshot is the only source of truth; nothing is patched
//! locally.
//!
//! The event loop is single-threaded and every external call blocks it to
//! completion, so reloads cannot race; the `loading` flag exists for
//! display only.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use chamois_chezmoi::{CommandOutput, Runner, collect_file_states};
use chamois_core::{
    ActionKind, DiffOrigin, DoctorRow, FileStatus, FilterMode, diff_actions, find_path,
    list_actions, parse_doctor_report,
};

use crate::ui::diffview::DiffLayout;

/// Shown when a diff could not be fetched or came back empty.
pub const NO_DIFF: &str = "(no diff)";

const PAGE: i16 = 20;

/// Which top-level tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Managed-file status and diffs
    Files,
    /// Diagnostic report
    Doctor,
}

/// Outcome message of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text
    pub text: String,
    /// Whether the action succeeded
    pub ok: bool,
}

/// The one live view. Entering [`View::Diff`] captures the target path,
/// not a snapshot row; the row is re-looked-up by key on every decision
/// point so it can go stale when the snapshot changes underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// File list
    List {
        /// Cursor position within the visible (filtered) files
        selected: usize,
        /// Commit-dialog input buffer, when open
        commit: Option<String>,
        /// Add-path input buffer, when open
        add: Option<String>,
    },
    /// Diff of one file
    Diff {
        /// Path of the diffed file, the re-lookup key
        target: String,
        /// Which comparison is shown
        origin: DiffOrigin,
        /// Raw diff text as returned by the external tool
        raw: String,
        /// Current layout
        layout: DiffLayout,
        /// Vertical scroll offset
        scroll: u16,
        /// Commit-dialog input buffer, when open
        commit: Option<String>,
    },
}

/// Dashboard state.
pub struct App<R: Runner> {
    runner: R,
    /// Current snapshot; replaced wholesale on every load
    pub files: Vec<FileStatus>,
    /// The one live view
    pub view: View,
    /// Active tab
    pub tab: Tab,
    /// List filter; survives List ⇄ Diff round trips
    pub filter: FilterMode,
    /// Outcome of the last action, rendered in the list
    pub notice: Option<Notice>,
    /// Persistent load-failure message; snapshot is empty while set
    pub load_error: Option<String>,
    /// Parsed diagnostic rows
    pub doctor_rows: Vec<DoctorRow>,
    /// Raw diagnostic text, the fallback when nothing parsed
    pub doctor_raw: String,
    /// Display-only in-flight flag
    pub loading: bool,
    /// Set when the user asked to leave
    pub should_quit: bool,
    default_layout: DiffLayout,
}

impl<R: Runner> App<R> {
    /// Create the dashboard in its initial state. Call [`App::load`] to
    /// populate the snapshot.
    pub fn new(runner: R, filter: FilterMode, layout: DiffLayout) -> Self {
        Self {
            runner,
            files: Vec::new(),
            view: View::List {
                selected: 0,
                commit: None,
                add: None,
            },
            tab: Tab::Files,
            filter,
            notice: None,
            load_error: None,
            doctor_rows: Vec::new(),
            doctor_raw: String::new(),
            loading: false,
            should_quit: false,
            default_layout: layout,
        }
    }

    // ── snapshot ────────────────────────────────────────────────────────

    /// Rebuild the snapshot from the external tools. On failure the
    /// snapshot is emptied, never left partially populated.
    pub fn load(&mut self) {
        self.loading = true;
        match collect_file_states(&self.runner) {
            Ok(files) => {
                debug!(files = files.len(), "snapshot loaded");
                self.files = files;
                self.load_error = None;
            }
            Err(e) => {
                debug!(error = %e, "snapshot load failed");
                self.files.clear();
                self.load_error = Some(e.to_string());
            }
        }
        self.clamp_selection();
        self.loading = false;
    }

    /// Files visible under the current filter, in snapshot order.
    pub fn visible(&self) -> Vec<&FileStatus> {
        self.files
            .iter()
            .filter(|f| self.filter.matches(f))
            .collect()
    }

    /// Counts per filter bucket: (all, modified, clean).
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        let modified = self.files.iter().filter(|f| !f.is_clean()).count();
        (self.files.len(), modified, self.files.len() - modified)
    }

    /// The file under the cursor, when the list is showing.
    pub fn selected_file(&self) -> Option<&FileStatus> {
        match &self.view {
            View::List { selected, .. } => self.visible().get(*selected).copied(),
            View::Diff { .. } => None,
        }
    }

    fn visible_len(&self) -> usize {
        self.files.iter().filter(|f| self.filter.matches(f)).count()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if let View::List { selected, .. } = &mut self.view {
            *selected = (*selected).min(len.saturating_sub(1));
        }
    }

    /// Move the list cursor.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        if let View::List { selected, .. } = &mut self.view {
            *selected = selected
                .saturating_add_signed(delta)
                .min(len - 1);
        }
    }

    /// Advance the list filter. Pure local transition; no external calls.
    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.clamp_selection();
    }

    /// Drop the active notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ── diff view ───────────────────────────────────────────────────────

    /// Open the local-drift diff for the file under the cursor.
    ///
    /// Fetches the content before transitioning; a failed or empty fetch
    /// falls back to a placeholder instead of failing the transition.
    pub fn open_local_diff(&mut self) {
        let Some((target, eligible)) = self
            .selected_file()
            .map(|f| (f.path.clone(), f.has_local_change()))
        else {
            return;
        };
        if !eligible {
            return;
        }

        let raw = match self.runner.diff(Some(&target)) {
            Ok(out) => non_empty(&out),
            Err(_) => NO_DIFF.to_string(),
        };
        self.view = View::Diff {
            target,
            origin: DiffOrigin::Local,
            raw,
            layout: self.default_layout,
            scroll: 0,
            commit: None,
        };
    }

    /// Open the unstaged repository diff for the file under the cursor.
    /// The source path is resolved first, then diffed.
    pub fn open_repo_diff(&mut self) {
        let Some((target, eligible)) = self
            .selected_file()
            .map(|f| (f.path.clone(), f.has_unstaged_change()))
        else {
            return;
        };
        if !eligible {
            return;
        }

        let fetched = self.runner.source_path(Some(&target)).and_then(|src| {
            let source = src.stdout.trim().to_string();
            self.runner.diff_source(&source)
        });
        let raw = match fetched {
            Ok(out) => non_empty(&out),
            Err(_) => NO_DIFF.to_string(),
        };
        self.view = View::Diff {
            target,
            origin: DiffOrigin::Repo,
            raw,
            layout: self.default_layout,
            scroll: 0,
            commit: None,
        };
    }

    /// Leave the diff, placing the cursor back on the diffed file when it
    /// is still visible.
    pub fn back_to_list(&mut self) {
        let selected = match &self.view {
            View::Diff { target, .. } => self
                .files
                .iter()
                .filter(|f| self.filter.matches(f))
                .position(|f| f.path == *target)
                .unwrap_or(0),
            View::List { selected, .. } => *selected,
        };
        self.view = View::List {
            selected,
            commit: None,
            add: None,
        };
    }

    /// Flip the diff layout.
    pub fn toggle_layout(&mut self) {
        if let View::Diff { layout, .. } = &mut self.view {
            *layout = layout.toggle();
        }
    }

    fn scroll_diff(&mut self, delta: i16) {
        if let View::Diff { scroll, .. } = &mut self.view {
            *scroll = scroll.saturating_add_signed(delta);
        }
    }

    // ── actions ─────────────────────────────────────────────────────────

    /// The uniform two-phase protocol every mutating action goes through:
    /// invoke, set the notice from the outcome, reload. Factored as one
    /// higher-order operation so no action can skip the reload.
    fn perform<F>(&mut self, op: F, ok_msg: String)
    where
        F: FnOnce(&R) -> chamois_chezmoi::Result<CommandOutput>,
    {
        self.notice = Some(match op(&self.runner) {
            Ok(out) if out.success => Notice {
                text: ok_msg,
                ok: true,
            },
            Ok(out) => Notice {
                text: out.stderr.trim().to_string(),
                ok: false,
            },
            Err(e) => Notice {
                text: e.to_string(),
                ok: false,
            },
        });
        self.load();
    }

    /// Run a diff-context action.
    ///
    /// Legality is evaluated against the *current* lookup of the target
    /// in the latest snapshot. A target that vanished underneath the open
    /// diff makes every action a no-op that returns to the list.
    pub fn run_diff_action(&mut self, kind: ActionKind) {
        let View::Diff { target, origin, .. } = &self.view else {
            return;
        };
        let target = target.clone();
        let origin = *origin;

        let file = find_path(&self.files, &target);
        let stale = file.is_none();
        let legal = diff_actions(origin, file);
        if !legal.iter().any(|a| a.kind == kind) {
            return;
        }
        if stale {
            self.back_to_list();
            return;
        }

        match kind {
            ActionKind::Save => {
                self.perform(|r| r.add(&target), format!("Added {target}"));
            }
            ActionKind::Restore => {
                self.perform(|r| r.apply(Some(&target)), "Applied".to_string());
                self.back_to_list();
            }
            ActionKind::Stage => {
                self.perform(
                    |r| {
                        let src = r.source_path(Some(&target))?;
                        let source = src.stdout.trim().to_string();
                        r.git(&["add", source.as_str()])
                    },
                    format!("Staged {target}"),
                );
            }
            ActionKind::Commit => self.open_commit_dialog(),
            ActionKind::SyncPush => {
                self.perform(|r| r.git(&["push"]), "Pushed".to_string());
            }
            ActionKind::SyncPull => {
                self.perform(|r| r.git(&["pull"]), "Pulled".to_string());
            }
            ActionKind::Untrack => {
                self.perform(
                    |r| r.forget(&target),
                    format!("Removed {target} from chezmoi"),
                );
            }
        }
    }

    /// Run a fleet-wide list-context action, subject to the aggregate
    /// gates.
    pub fn run_list_action(&mut self, kind: ActionKind) {
        if !list_actions(&self.files).iter().any(|a| a.kind == kind) {
            return;
        }
        match kind {
            ActionKind::Commit => self.open_commit_dialog(),
            ActionKind::SyncPush => {
                self.perform(|r| r.git(&["push"]), "Pushed".to_string());
            }
            ActionKind::SyncPull => {
                self.perform(|r| r.git(&["pull"]), "Pulled".to_string());
            }
            _ => {}
        }
    }

    // ── commit dialog ───────────────────────────────────────────────────

    /// Whether the commit dialog is open in either view.
    #[must_use]
    pub fn commit_dialog_open(&self) -> bool {
        self.commit_buffer().is_some()
    }

    /// The commit input buffer, when open.
    #[must_use]
    pub fn commit_buffer(&self) -> Option<&String> {
        match &self.view {
            View::List { commit, .. } | View::Diff { commit, .. } => commit.as_ref(),
        }
    }

    fn commit_slot(&mut self) -> &mut Option<String> {
        match &mut self.view {
            View::List { commit, .. } | View::Diff { commit, .. } => commit,
        }
    }

    fn open_commit_dialog(&mut self) {
        *self.commit_slot() = Some(String::new());
    }

    /// Close the dialog without side effects.
    pub fn cancel_commit(&mut self) {
        *self.commit_slot() = None;
    }

    /// Commit with the entered message. An empty message keeps the
    /// dialog open.
    pub fn confirm_commit(&mut self) {
        let Some(msg) = self.commit_buffer().map(|b| b.trim().to_string()) else {
            return;
        };
        if msg.is_empty() {
            return;
        }
        self.cancel_commit();
        self.perform(
            |r| r.git(&["commit", "-m", msg.as_str()]),
            "Committed".to_string(),
        );
    }

    // ── add prompt ──────────────────────────────────────────────────────

    /// Whether the add-path prompt is open.
    #[must_use]
    pub fn add_prompt_open(&self) -> bool {
        self.add_buffer().is_some()
    }

    /// The add-path input buffer, when open.
    #[must_use]
    pub fn add_buffer(&self) -> Option<&String> {
        match &self.view {
            View::List { add, .. } => add.as_ref(),
            View::Diff { .. } => None,
        }
    }

    fn open_add_prompt(&mut self) {
        if let View::List { add, .. } = &mut self.view {
            *add = Some(String::new());
        }
    }

    fn cancel_add(&mut self) {
        if let View::List { add, .. } = &mut self.view {
            *add = None;
        }
    }

    /// Submit the entered path to `chezmoi add`.
    pub fn confirm_add(&mut self) {
        let Some(path) = self.add_buffer().map(|b| b.trim().to_string()) else {
            return;
        };
        if path.is_empty() {
            return;
        }
        self.cancel_add();
        self.perform(|r| r.add(&path), format!("Added {path}"));
    }

    // ── doctor tab ──────────────────────────────────────────────────────

    /// Run diagnostics and parse the report. A report that does not parse
    /// is kept raw for fallback display.
    pub fn load_doctor(&mut self) {
        self.loading = true;
        match self.runner.doctor() {
            Ok(out) => {
                let text = out.text().to_string();
                self.doctor_rows = parse_doctor_report(&text);
                self.doctor_raw = text;
            }
            Err(e) => {
                self.doctor_rows.clear();
                self.doctor_raw = e.to_string();
            }
        }
        self.loading = false;
    }

    // ── key routing ─────────────────────────────────────────────────────

    /// Route one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Input sub-states capture the keyboard first.
        if self.commit_dialog_open() {
            self.handle_commit_key(key);
            return;
        }
        if self.add_prompt_open() {
            self.handle_add_key(key);
            return;
        }

        match self.tab {
            Tab::Doctor => self.handle_doctor_key(key),
            Tab::Files => match &self.view {
                View::List { .. } => self.handle_list_key(key),
                View::Diff { .. } => self.handle_diff_key(key),
            },
        }
    }

    fn handle_commit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_commit(),
            KeyCode::Enter => self.confirm_commit(),
            KeyCode::Backspace => {
                if let Some(buf) = self.commit_slot() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.commit_slot() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_add_key(&mut self, key: KeyEvent) {
        let View::List { add, .. } = &mut self.view else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.cancel_add(),
            KeyCode::Enter => self.confirm_add(),
            KeyCode::Backspace => {
                if let Some(buf) = add {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = add {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.tab = Tab::Doctor;
                self.load_doctor();
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('r') => self.load(),
            KeyCode::Char('a') => self.open_add_prompt(),
            KeyCode::Enter | KeyCode::Char('d') => self.open_local_diff(),
            KeyCode::Char('g') => self.open_repo_diff(),
            KeyCode::Esc => self.dismiss_notice(),
            KeyCode::Char(c) => {
                let fleet = [ActionKind::Commit, ActionKind::SyncPush, ActionKind::SyncPull];
                if let Some(kind) = fleet.into_iter().find(|k| action_key(*k) == c) {
                    self.run_list_action(kind);
                }
            }
            _ => {}
        }
    }

    fn handle_diff_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.back_to_list(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_diff(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_diff(-1),
            KeyCode::PageDown | KeyCode::Char('d') => self.scroll_diff(PAGE),
            KeyCode::PageUp | KeyCode::Char('u') => self.scroll_diff(-PAGE),
            KeyCode::Home => {
                if let View::Diff { scroll, .. } = &mut self.view {
                    *scroll = 0;
                }
            }
            KeyCode::Char('v') => self.toggle_layout(),
            KeyCode::Char(c) => {
                let all = [
                    ActionKind::Save,
                    ActionKind::Restore,
                    ActionKind::Stage,
                    ActionKind::Commit,
                    ActionKind::SyncPush,
                    ActionKind::SyncPull,
                    ActionKind::Untrack,
                ];
                if let Some(kind) = all.into_iter().find(|k| action_key(*k) == c) {
                    self.run_diff_action(kind);
                }
            }
            _ => {}
        }
    }

    fn handle_doctor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.tab = Tab::Files,
            KeyCode::Char('r') => self.load_doctor(),
            _ => {}
        }
    }
}

/// Keyboard shortcut for an action, shared by dispatch and the footer.
#[must_use]
pub fn action_key(kind: ActionKind) -> char {
    match kind {
        ActionKind::Save => 's',
        ActionKind::Restore => 'r',
        ActionKind::Stage => 'a',
        ActionKind::Commit => 'c',
        ActionKind::SyncPush => 'P',
        ActionKind::SyncPull => 'F',
        ActionKind::Untrack => 'x',
    }
}

fn non_empty(out: &CommandOutput) -> String {
    let text = out.text();
    if text.is_empty() {
        NO_DIFF.to_string()
    } else {
        text.to_string()
    }
}
