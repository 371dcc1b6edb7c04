//! Terminal UI for the chamois dashboard
//!
//! Terminal lifecycle, the event loop, and rendering. All state and key
//! routing live in [`app`]; this module only draws what the app says and
//! feeds key events back in.

pub mod app;
pub mod diffview;

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

use chamois_chezmoi::Runner;
use chamois_core::{DiffOrigin, FileStatus, Severity, diff_actions, find_path, list_actions};

use crate::config::Config;
use app::{App, Tab, View, action_key};

/// Run the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or an event cannot
/// be read.
pub fn run<R: Runner>(runner: R, config: &Config) -> Result<()> {
    let mut app = App::new(runner, config.filter, config.layout);
    app.load();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    res
}

fn run_app<B: ratatui::backend::Backend, R: Runner>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
            app.handle_key(key);
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw<R: Runner>(frame: &mut Frame, app: &App<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], app);
    match app.tab {
        Tab::Doctor => draw_doctor(frame, chunks[1], app),
        Tab::Files => match &app.view {
            View::List { .. } => draw_list(frame, chunks[1], app),
            View::Diff { .. } => draw_diff(frame, chunks[1], app),
        },
    }
    draw_status_line(frame, chunks[2], app);
    draw_footer(frame, chunks[3], app);

    if app.commit_dialog_open() {
        draw_commit_dialog(frame, app);
    }
}

fn draw_tabs<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let index = match app.tab {
        Tab::Files => 0,
        Tab::Doctor => 1,
    };
    let tabs = Tabs::new(vec![" Files ", " Doctor "])
        .select(index)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_list<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let (all, modified, clean) = app.counts();
    let title = format!(
        " Files — all {all} · modified {modified} · clean {clean} — filter: {} ",
        app.filter.name()
    );

    let visible = app.visible();
    let items: Vec<ListItem> = visible.iter().map(|file| ListItem::new(file_row(file))).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("❯ ");

    let mut state = ListState::default();
    if let View::List { selected, .. } = &app.view
        && !visible.is_empty()
    {
        state.select(Some(*selected));
    }
    frame.render_stateful_widget(list, area, &mut state);

    if visible.is_empty() && app.load_error.is_none() {
        let empty = Paragraph::new("No managed files found.")
            .style(Style::default().fg(Color::DarkGray));
        let inner = area.inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 2,
        });
        frame.render_widget(empty, inner);
    }
}

fn file_row(file: &FileStatus) -> Line<'static> {
    let mut spans = vec![if file.is_clean() {
        Span::styled(file.path.clone(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(file.path.clone())
    }];

    if let Some(label) = file.local.label() {
        spans.push(Span::styled(
            format!("  ● {label}"),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(label) = file.index.label() {
        spans.push(Span::styled(
            format!("  ~ {label}"),
            Style::default().fg(Color::Blue),
        ));
    }
    if let Some(label) = file.worktree.label() {
        spans.push(Span::styled(
            format!("  ~ {label}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if file.ahead > 0 {
        spans.push(Span::styled(
            format!("  ↑ {} ahead", file.ahead),
            Style::default().fg(Color::Cyan),
        ));
    }
    if file.behind > 0 {
        spans.push(Span::styled(
            format!("  ↓ {} behind", file.behind),
            Style::default().fg(Color::Magenta),
        ));
    }

    Line::from(spans)
}

fn draw_diff<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let View::Diff {
        target,
        origin,
        raw,
        layout,
        scroll,
        ..
    } = &app.view
    else {
        return;
    };

    let origin_label = match origin {
        DiffOrigin::Local => "local changes",
        DiffOrigin::Repo => "repo changes",
    };
    let block = Block::default()
        .title(format!(" {target} — {origin_label} ({}) ", layout.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner_width = area.width.saturating_sub(2);

    let paragraph = Paragraph::new(diffview::render(raw, *layout, inner_width))
        .block(block)
        .scroll((*scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_doctor<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let block = Block::default()
        .title(" Doctor ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if app.doctor_rows.is_empty() {
        // Nothing parsed; show whatever the tool said.
        let text = if app.doctor_raw.trim().is_empty() {
            "(no output)".to_string()
        } else {
            app.doctor_raw.clone()
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .doctor_rows
        .iter()
        .map(|row| {
            let color = match row.severity() {
                Severity::Ok => Color::Green,
                Severity::Warning => Color::Yellow,
                Severity::Error => Color::Red,
                Severity::Info => Color::DarkGray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8}", row.result), Style::default().fg(color)),
                Span::styled(
                    format!("{:<24}", row.check),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(row.message.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_status_line<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let line = if let Some(buf) = app.add_buffer() {
        Line::from(vec![
            Span::styled("add path: ", Style::default().fg(Color::Cyan)),
            Span::raw(buf.clone()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ])
    } else if app.loading {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(error) = &app.load_error {
        Line::from(Span::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(notice) = &app.notice {
        let (symbol, color) = if notice.ok {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        Line::from(Span::styled(
            format!("{symbol} {}", notice.text),
            Style::default().fg(color),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_footer<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let hints = match app.tab {
        Tab::Doctor => "r reload · tab files · q quit".to_string(),
        Tab::Files => match &app.view {
            View::List { .. } => {
                let mut hints =
                    "j/k move · d diff · g repo diff · f filter · a add · r reload".to_string();
                for action in list_actions(&app.files) {
                    hints.push_str(&format!(
                        " · {} {}",
                        action_key(action.kind),
                        action.label
                    ));
                }
                hints.push_str(" · tab doctor · q quit");
                hints
            }
            View::Diff { target, origin, .. } => {
                let file = find_path(&app.files, target);
                let mut hints = String::new();
                for action in diff_actions(*origin, file) {
                    hints.push_str(&format!("{} {} · ", action_key(action.kind), action.label));
                }
                hints.push_str("v layout · j/k scroll · esc back");
                hints
            }
        },
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_commit_dialog<R: Runner>(frame: &mut Frame, app: &App<R>) {
    let Some(buf) = app.commit_buffer() else {
        return;
    };

    let area = centered_rect(frame.area(), 60, 5);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Commit message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let text = vec![
        Line::from(vec![
            Span::raw(buf.clone()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "enter commit · esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
