//! Shared UI components (status bar, form fields, help modal).
//!
//! Contains small building blocks reused by the auth and users screens.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::form_view::FormView;
use crate::app::keymap::{KeyAction, Keymap, describe_action};
use crate::app::{AppState, Screen, Theme, ToastKind};
use crate::validate::FormRecord;

/// Render the bottom status bar: the toast if one is showing, else context.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    if let Some(toast) = &app.toast {
        let color = match toast.kind {
            ToastKind::Success => app.theme.success,
            ToastKind::Error => app.theme.error,
        };
        let p = Paragraph::new(format!(" {}", toast.message))
            .style(base.fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(p, area);
        return;
    }

    let msg = match app.screen {
        Screen::Auth => {
            " Tab/Shift+Tab: field  Enter: submit  Ctrl+T: sign in/sign up  Esc: quit".to_string()
        }
        Screen::Dashboard => {
            let state = if app.loading {
                "loading"
            } else if app.logging_out {
                "signing out"
            } else {
                "ready"
            };
            format!(
                " {state}  page {}/{}  rows:{}  ?: help",
                app.page,
                app.total_pages,
                app.users.len()
            )
        }
    };
    f.render_widget(Paragraph::new(msg).style(base), area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Long values (data URLs) show only their end, where the cursor is.
const MAX_VALUE_CHARS: usize = 44;

fn tail(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    let rest: String = s.chars().skip(n - (max - 1)).collect();
    format!("…{rest}")
}

/// Number of lines [`form_lines`] produces for `view`.
pub fn form_height<R: FormRecord>(view: &FormView<R>) -> u16 {
    let errors: usize = R::fields()
        .iter()
        .map(|f| view.form.visible_errors(*f).len())
        .sum();
    let extra = usize::from(view.submit_error.is_some());
    (R::fields().len() * 2 + errors + extra + 2) as u16
}

/// Label/value rows for each field, with messages under touched fields and
/// a submit control that is dimmed while the form cannot be sent.
pub fn form_lines<R: FormRecord>(
    view: &FormView<R>,
    theme: &Theme,
    submit_label: &str,
) -> Vec<Line<'static>> {
    let label_w = R::fields()
        .iter()
        .map(|f| R::label(*f).len())
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for &field in R::fields() {
        let focused = view.focused_field() == field;
        let raw = view.form.value(field);
        let shown = if view.is_masked(field) {
            "•".repeat(raw.chars().count())
        } else {
            tail(raw, MAX_VALUE_CHARS)
        };
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(theme.focus).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        let cursor = if focused && !view.submitting { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), label_style),
            Span::styled(format!("{:>w$}: ", R::label(field), w = label_w), label_style),
            Span::styled(format!("{shown}{cursor}"), Style::default().fg(theme.text)),
        ]));
        for msg in view.form.visible_errors(field) {
            lines.push(Line::from(Span::styled(
                format!("{:w$}✗ {msg}", "", w = label_w + 4),
                Style::default().fg(theme.error),
            )));
        }
        lines.push(Line::raw(""));
    }

    if let Some(err) = &view.submit_error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }
    let (label, style) = if view.submitting {
        (format!("[ {submit_label}… ]"), Style::default().fg(theme.muted))
    } else if view.can_submit() {
        (
            format!("[ {submit_label} ]"),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("[ {submit_label} ]"),
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
        )
    };
    lines.push(Line::from(Span::styled(format!("  {label}"), style)));
    lines
}

/// Group the bound keys by the description of their action.
pub fn binding_rows(keymap: &Keymap) -> BTreeMap<&'static str, BTreeSet<String>> {
    let mut rows: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in keymap.all_bindings() {
        if action == KeyAction::Ignore {
            continue;
        }
        rows.entry(describe_action(action))
            .or_default()
            .insert(Keymap::format_key(mods, code));
    }
    rows
}

/// Render the help modal listing dashboard bindings and form keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let rows = binding_rows(&app.keymap);
    let col1_w = rows.keys().map(|k| k.len()).max().unwrap_or(0).max(14);
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::raw(format!("  {label:>col1_w$} │ ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Users dashboard:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &rows {
        lines.push(row(*label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Forms:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [
        ("Next field", "Tab, Down"),
        ("Previous field", "Shift+Tab, Up"),
        ("Submit", "Enter"),
        ("Load avatar file", "Ctrl+O"),
        ("Cancel / Close", "Esc"),
    ] {
        lines.push(row(label, value.to_string()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::new_login_view;
    use crate::rules::login::LoginField;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect { x: 0, y: 0, width: 20, height: 10 };
        let r = centered_rect(40, 4, area);
        assert_eq!((r.x, r.y, r.width, r.height), (0, 3, 20, 4));
    }

    #[test]
    fn untouched_errors_are_not_drawn_and_password_is_masked() {
        let mut view = new_login_view();
        view.form.on_change(LoginField::Password, "abc");
        let text: String = form_lines(&view, &Theme::default(), "Sign in")
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("•••"));
        assert!(!text.contains("abc"));
        assert!(!text.contains("required"));

        view.form.on_blur(LoginField::Email);
        let text: String = form_lines(&view, &Theme::default(), "Sign in")
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Email is required"));
    }

    #[test]
    fn long_values_keep_their_end() {
        assert_eq!(tail("short", 10), "short");
        assert_eq!(tail("abcdefghij", 4), "…hij");
    }

    #[test]
    fn help_rows_group_keys_by_action() {
        let rows = binding_rows(&Keymap::default());
        let quit = rows.get("Quit").unwrap();
        assert!(quit.contains("q") && quit.contains("Ctrl+c"));
        assert!(!rows.contains_key(""));
    }
}
