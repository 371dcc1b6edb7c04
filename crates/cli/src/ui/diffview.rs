//! Raw diff rendering
//!
//! chezmoi and git hand back unified diff text; chamois only lays it out.
//! Lines are classified by prefix and rendered as styled terminal text in
//! either a unified or a side-by-side layout. Text that is not a diff at
//! all (error output, the no-diff placeholder) classifies as context and
//! passes through untouched.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use serde::{Deserialize, Serialize};

/// How a diff is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffLayout {
    /// Old and new side by side
    #[default]
    SideBySide,
    /// Traditional unified layout
    Unified,
}

impl DiffLayout {
    /// The other layout.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::SideBySide => Self::Unified,
            Self::Unified => Self::SideBySide,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SideBySide => "side-by-side",
            Self::Unified => "unified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// File headers and git metadata
    Meta,
    /// Hunk header
    Hunk,
    Add,
    Remove,
    Context,
}

fn classify(line: &str) -> LineKind {
    if line.starts_with("diff ")
        || line.starts_with("index ")
        || line.starts_with("--- ")
        || line.starts_with("+++ ")
        || line.starts_with("old mode")
        || line.starts_with("new mode")
        || line.starts_with("new file")
        || line.starts_with("deleted file")
        || line.starts_with("rename ")
    {
        LineKind::Meta
    } else if line.starts_with("@@") {
        LineKind::Hunk
    } else if line.starts_with('+') {
        LineKind::Add
    } else if line.starts_with('-') {
        LineKind::Remove
    } else {
        LineKind::Context
    }
}

fn style_for(kind: LineKind) -> Style {
    match kind {
        LineKind::Meta => Style::default().add_modifier(Modifier::BOLD),
        LineKind::Hunk => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        LineKind::Add => Style::default().fg(Color::Green),
        LineKind::Remove => Style::default().fg(Color::Red),
        LineKind::Context => Style::default(),
    }
}

/// Strip the unified-diff marker column from a content line.
fn content_of(line: &str) -> &str {
    match line.chars().next() {
        Some('+' | '-' | ' ') => &line[1..],
        _ => line,
    }
}

/// Render raw diff text into styled terminal lines.
#[must_use]
pub fn render(raw: &str, layout: DiffLayout, width: u16) -> Text<'static> {
    match layout {
        DiffLayout::Unified => render_unified(raw),
        DiffLayout::SideBySide => render_side_by_side(raw, width),
    }
}

fn render_unified(raw: &str) -> Text<'static> {
    let lines = raw
        .lines()
        .map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                style_for(classify(line)),
            ))
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn render_side_by_side(raw: &str, width: u16) -> Text<'static> {
    let column = (usize::from(width).saturating_sub(3)) / 2;
    let lines: Vec<&str> = raw.lines().collect();
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let kind = classify(lines[i]);
        match kind {
            LineKind::Meta | LineKind::Hunk => {
                out.push(Line::from(Span::styled(
                    lines[i].to_string(),
                    style_for(kind),
                )));
                i += 1;
            }
            LineKind::Remove => {
                // A run of removals followed by a run of additions pairs
                // up into changed rows.
                let removes_start = i;
                while i < lines.len() && classify(lines[i]) == LineKind::Remove {
                    i += 1;
                }
                let adds_start = i;
                while i < lines.len() && classify(lines[i]) == LineKind::Add {
                    i += 1;
                }
                let removes = &lines[removes_start..adds_start];
                let adds = &lines[adds_start..i];
                for row in 0..removes.len().max(adds.len()) {
                    out.push(split_row(
                        removes.get(row).copied(),
                        adds.get(row).copied(),
                        column,
                    ));
                }
            }
            LineKind::Add => {
                out.push(split_row(None, Some(lines[i]), column));
                i += 1;
            }
            LineKind::Context => {
                let content = content_of(lines[i]);
                out.push(split_row_styled(
                    content,
                    Style::default(),
                    content,
                    Style::default(),
                    column,
                ));
                i += 1;
            }
        }
    }

    Text::from(out)
}

fn split_row(remove: Option<&str>, add: Option<&str>, column: usize) -> Line<'static> {
    let (left, left_style) = match remove {
        Some(line) => (content_of(line), style_for(LineKind::Remove)),
        None => ("", Style::default()),
    };
    let (right, right_style) = match add {
        Some(line) => (content_of(line), style_for(LineKind::Add)),
        None => ("", Style::default()),
    };
    split_row_styled(left, left_style, right, right_style, column)
}

fn split_row_styled(
    left: &str,
    left_style: Style,
    right: &str,
    right_style: Style,
    column: usize,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(pad_clip(left, column), left_style),
        Span::styled(" │ ".to_string(), Style::default().fg(Color::DarkGray)),
        Span::styled(pad_clip(right, column), right_style),
    ])
}

/// Clip to the column width and pad the remainder with spaces.
fn pad_clip(text: &str, column: usize) -> String {
    let clipped: String = text.chars().take(column).collect();
    format!("{clipped:<column$}")
}
