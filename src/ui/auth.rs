//! Sign-in / sign-up screen.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, AuthTab};
use crate::ui::components::{centered_rect, form_height, form_lines};

pub fn render_auth(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {label} "),
                Style::default()
                    .fg(theme.highlight_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(theme.muted))
        }
    };

    let mut lines = vec![
        Line::from(vec![
            tab("Sign In", app.auth_tab == AuthTab::SignIn),
            Span::raw("  "),
            tab("Sign Up", app.auth_tab == AuthTab::SignUp),
        ]),
        Line::raw(""),
    ];
    let (title, height) = match app.auth_tab {
        AuthTab::SignIn => {
            lines.extend(form_lines(&app.login, theme, "Sign in"));
            ("Welcome back", form_height(&app.login))
        }
        AuthTab::SignUp => {
            lines.extend(form_lines(&app.register, theme, "Create account"));
            ("Create an account", form_height(&app.register))
        }
    };

    let rect = centered_rect(64, height + 4, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title_style(Style::default().fg(theme.title)),
    );
    f.render_widget(p, rect);
}
