pub mod auth;
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let who = match &app.user {
        Some(u) => format!("Welcome, {} ({})", u.username, u.email),
        None => "not signed in".to_string(),
    };
    let hint = match app.screen {
        Screen::Auth => "Ctrl+T: switch form; Enter: submit; Esc: quit",
        Screen::Dashboard => "n: new; Enter: edit; d: delete; ←/→: page; L: sign out; ?: help; q: quit",
    };
    let p = Paragraph::new(format!("{who}  {hint}"))
        .block(
            Block::default()
                .title("reqres-admin")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    match app.screen {
        Screen::Auth => auth::render_auth(f, root[1], app),
        Screen::Dashboard => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
                .split(root[1]);
            users::render_users_table(f, body[0], app);
            users::render_user_details(f, body[1], app);
        }
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::UserForm { mode, view }) => {
            users::render_user_form_modal(f, area, app, *mode, view);
        }
        Some(ModalState::DeleteConfirm { user, selected, submitting }) => {
            users::render_delete_modal(f, area, app, user, *selected, *submitting);
        }
        Some(ModalState::Help) => components::render_help_modal(f, area, app),
        None => {}
    }
}
