use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::app::form_view::FormView;
use crate::app::{AppState, UserFormMode};
use crate::api::users::User;
use crate::rules::user::UserForm;
use crate::ui::components::{centered_rect, form_height, form_lines};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(area);

    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.users.is_empty() {
        let msg = if app.loading {
            Line::from(Span::styled("Loading users…", Style::default().fg(app.theme.muted)))
        } else if let Some(err) = &app.list_error {
            Line::from(Span::styled(err.clone(), Style::default().fg(app.theme.error)))
        } else {
            Line::from(Span::styled("No users on this page", Style::default().fg(app.theme.muted)))
        };
        f.render_widget(Paragraph::new(msg).block(block), chunks[0]);
    } else {
        let rows = app.users.iter().map(|u| {
            Row::new(vec![
                Cell::from(u.id.to_string()),
                Cell::from(u.full_name()),
                Cell::from(u.email.clone()),
                Cell::from(avatar_summary(&u.avatar)),
            ])
        });
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ];
        let header = Row::new(vec!["ID", "Name", "Email", "Avatar"]).style(
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        );
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .column_spacing(1);
        let mut state = TableState::default().with_selected(Some(app.selected_user_index));
        f.render_stateful_widget(table, chunks[0], &mut state);
    }

    let footer = Paragraph::new(format!("Page {} of {}", app.page, app.total_pages))
        .style(Style::default().fg(app.theme.muted));
    f.render_widget(footer, chunks[1]);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => format!(
            "ID: {}\nFirst name: {}\nLast name: {}\nEmail: {}\nAvatar: {}",
            u.id,
            u.first_name,
            u.last_name,
            u.email,
            avatar_summary(&u.avatar)
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// Data URLs are too long for a cell; show their media type instead.
pub fn avatar_summary(avatar: &str) -> String {
    if avatar.is_empty() {
        return "-".to_string();
    }
    match avatar.strip_prefix("data:") {
        Some(rest) => {
            let mime = rest.split([';', ',']).next().unwrap_or("");
            format!("inline {mime}")
        }
        None => avatar.to_string(),
    }
}

pub fn render_user_form_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    mode: UserFormMode,
    view: &FormView<UserForm>,
) {
    let (title, submit) = match mode {
        UserFormMode::Create => ("New user".to_string(), "Create"),
        UserFormMode::Edit { id } => (format!("Edit user #{id}"), "Save"),
    };
    let mut lines = form_lines(view, &app.theme, submit);
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Avatar takes a URL or a file path (Ctrl+O loads the file). Esc closes.",
        Style::default().fg(app.theme.muted),
    )));
    let height = form_height(view) + 4;
    let rect = centered_rect(72, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.focus)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    user: &User,
    selected: usize,
    submitting: bool,
) {
    let rect = centered_rect(54, 7, area);
    let mut body = format!(
        "Delete {} <{}> (id {})?\n\n",
        user.full_name(),
        user.email,
        user.id
    );
    if submitting {
        body.push_str("  Deleting…");
    } else {
        let yes = if selected == 0 { "[Delete]" } else { " Delete " };
        let no = if selected == 1 { "[Cancel]" } else { " Cancel " };
        body.push_str(&format!("  {}    {}", yes, no));
    }
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_summary_hides_data_urls() {
        assert_eq!(avatar_summary(""), "-");
        assert_eq!(avatar_summary("data:image/png;base64,AAAA"), "inline image/png");
        assert_eq!(
            avatar_summary("https://reqres.in/img/faces/2-image.jpg"),
            "https://reqres.in/img/faces/2-image.jpg"
        );
    }
}
