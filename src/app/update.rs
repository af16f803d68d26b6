use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::form_view::FormInput;
use crate::app::keymap::KeyAction;
use crate::app::tasks::{Task, TaskOutcome, TaskRunner};
use crate::app::{
    AppState, AuthTab, ModalState, Screen, ToastKind, UserFormMode, avatar, new_user_view,
};
use crate::api::auth::{AuthResult, AuthUser};
use crate::rules::user::{UserField, UserForm};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    mut runner: TaskRunner,
) -> Result<()> {
    for task in app.startup_tasks() {
        runner.spawn(task);
    }

    loop {
        while let Some(outcome) = runner.try_recv() {
            for task in app.apply(outcome) {
                runner.spawn(task);
            }
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    for task in app.handle_key(key) {
                        runner.spawn(task);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
        app.expire_toast();
    }

    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

impl AppState {
    /// Work to kick off right after launch.
    pub fn startup_tasks(&mut self) -> Vec<Task> {
        match self.screen {
            Screen::Dashboard => self.load_page(self.page),
            Screen::Auth => Vec::new(),
        }
    }

    fn load_page(&mut self, page: u32) -> Vec<Task> {
        if self.loading {
            return Vec::new();
        }
        self.page = page.max(1);
        self.loading = true;
        self.list_error = None;
        vec![Task::LoadUsers { page: self.page }]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Task> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }
        match self.screen {
            Screen::Auth => self.handle_auth_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> Vec<Task> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('t') if ctrl => {
                self.auth_tab = match self.auth_tab {
                    AuthTab::SignIn => AuthTab::SignUp,
                    AuthTab::SignUp => AuthTab::SignIn,
                };
                return Vec::new();
            }
            KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return Vec::new();
            }
            _ => {}
        }
        match self.auth_tab {
            AuthTab::SignIn => match self.login.handle_key(key) {
                FormInput::Submit(values) => vec![Task::Login {
                    email: values.email,
                    password: values.password,
                }],
                FormInput::Consumed | FormInput::Ignored => Vec::new(),
            },
            AuthTab::SignUp => match self.register.handle_key(key) {
                FormInput::Submit(values) => vec![Task::Register {
                    username: values.username,
                    email: values.email,
                    password: values.password,
                }],
                FormInput::Consumed | FormInput::Ignored => Vec::new(),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Vec<Task> {
        let Some(action) = self.keymap.resolve(&key) else {
            return Vec::new();
        };
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::OpenHelp => self.modal = Some(ModalState::Help),
            KeyAction::NewUser => {
                self.modal = Some(ModalState::UserForm {
                    mode: UserFormMode::Create,
                    view: new_user_view(UserForm::default()),
                });
            }
            KeyAction::EditSelection => {
                if let Some(user) = self.selected_user() {
                    let (id, form) = (user.id, user.to_form());
                    self.modal = Some(ModalState::UserForm {
                        mode: UserFormMode::Edit { id },
                        view: new_user_view(form),
                    });
                }
            }
            KeyAction::DeleteSelection => {
                if let Some(user) = self.selected_user().cloned() {
                    self.modal = Some(ModalState::DeleteConfirm { user, selected: 1, submitting: false });
                }
            }
            KeyAction::Refresh => return self.load_page(self.page),
            KeyAction::Logout => {
                if !self.logging_out {
                    self.logging_out = true;
                    return vec![Task::Logout];
                }
            }
            KeyAction::MoveUp => {
                if self.selected_user_index > 0 {
                    self.selected_user_index -= 1;
                }
            }
            KeyAction::MoveDown => {
                if self.selected_user_index + 1 < self.users.len() {
                    self.selected_user_index += 1;
                }
            }
            KeyAction::PrevPage => {
                if self.page > 1 {
                    return self.load_page(self.page - 1);
                }
            }
            KeyAction::NextPage => {
                if self.page < self.total_pages {
                    return self.load_page(self.page + 1);
                }
            }
            KeyAction::Ignore => {}
        }
        Vec::new()
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Vec<Task> {
        let Some(modal) = self.modal.as_mut() else {
            return Vec::new();
        };
        match modal {
            ModalState::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.modal = None;
                }
                Vec::new()
            }
            ModalState::DeleteConfirm { user, selected, submitting } => {
                if *submitting {
                    return Vec::new();
                }
                match key.code {
                    KeyCode::Esc => self.modal = None,
                    KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                        *selected = 1 - *selected;
                    }
                    KeyCode::Enter => {
                        if *selected == 0 {
                            *submitting = true;
                            return vec![Task::DeleteUser { id: user.id }];
                        }
                        self.modal = None;
                    }
                    _ => {}
                }
                Vec::new()
            }
            ModalState::UserForm { mode, view } => {
                if key.code == KeyCode::Esc && !view.submitting {
                    self.modal = None;
                    return Vec::new();
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('o') {
                    let path = view.form.value(UserField::Avatar).to_string();
                    if path.trim().is_empty() || avatar::is_inline_or_remote(&path) {
                        return Vec::new();
                    }
                    match avatar::encode_avatar_file(&path) {
                        Ok(encoded) => {
                            view.form.set_values(|v| v.avatar = encoded);
                            self.show_toast(ToastKind::Success, "Avatar image loaded");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "avatar load failed");
                            self.show_toast(ToastKind::Error, format!("Avatar: {e}"));
                        }
                    }
                    return Vec::new();
                }
                match view.handle_key(key) {
                    FormInput::Submit(values) => match *mode {
                        UserFormMode::Create => vec![Task::CreateUser(values)],
                        UserFormMode::Edit { id } => vec![Task::UpdateUser { id, form: values }],
                    },
                    FormInput::Consumed | FormInput::Ignored => Vec::new(),
                }
            }
        }
    }

    /// Fold a finished task into the state; may request follow-up work.
    pub fn apply(&mut self, outcome: TaskOutcome) -> Vec<Task> {
        match outcome {
            TaskOutcome::Login { email, username, result } => match result {
                AuthResult::Success { .. } => {
                    self.sign_in(AuthUser { username, email }, "Login successful")
                }
                AuthResult::Failure { error } => {
                    self.show_toast(ToastKind::Error, error.clone());
                    self.login.finish_submit(Some(error));
                    Vec::new()
                }
            },
            TaskOutcome::Register { username, email, result } => match result {
                AuthResult::Success { .. } => {
                    self.sign_in(AuthUser { username, email }, "Registration successful")
                }
                AuthResult::Failure { error } => {
                    self.show_toast(ToastKind::Error, error.clone());
                    self.register.finish_submit(Some(error));
                    Vec::new()
                }
            },
            TaskOutcome::Logout(result) => {
                self.logging_out = false;
                match result {
                    AuthResult::Success { .. } => {
                        self.screen = Screen::Auth;
                        self.user = None;
                        self.users.clear();
                        self.page = 1;
                        self.total_pages = 1;
                        self.selected_user_index = 0;
                        self.modal = None;
                        self.loading = false;
                        self.list_error = None;
                        self.show_toast(ToastKind::Success, "Logged out successfully");
                    }
                    AuthResult::Failure { error } => self.show_toast(ToastKind::Error, error),
                }
                Vec::new()
            }
            TaskOutcome::Users { page, result } => {
                self.loading = false;
                if self.screen != Screen::Dashboard {
                    tracing::debug!(page, "dropping page loaded after sign-out");
                    return Vec::new();
                }
                match result {
                    Ok(data) => {
                        self.page = page;
                        self.total_pages = data.total_pages.max(1);
                        self.users = data.data;
                        self.selected_user_index =
                            self.selected_user_index.min(self.users.len().saturating_sub(1));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        self.show_toast(ToastKind::Error, message.clone());
                        self.list_error = Some(message);
                    }
                }
                Vec::new()
            }
            TaskOutcome::Created(result) => {
                match result {
                    Ok(user) => {
                        self.users.insert(0, user);
                        self.selected_user_index = 0;
                        self.close_user_form("User created successfully");
                    }
                    Err(e) => self.fail_user_form(e.to_string()),
                }
                Vec::new()
            }
            TaskOutcome::Updated(result) => {
                match result {
                    Ok(updated) => {
                        if let Some(existing) = self.users.iter_mut().find(|u| u.id == updated.id) {
                            *existing = updated;
                        }
                        self.close_user_form("User updated successfully");
                    }
                    Err(e) => self.fail_user_form(e.to_string()),
                }
                Vec::new()
            }
            TaskOutcome::Deleted { id, result } => {
                if matches!(self.modal, Some(ModalState::DeleteConfirm { .. })) {
                    self.modal = None;
                }
                match result {
                    Ok(()) => {
                        self.users.retain(|u| u.id != id);
                        self.selected_user_index =
                            self.selected_user_index.min(self.users.len().saturating_sub(1));
                        self.show_toast(ToastKind::Success, "User deleted successfully");
                    }
                    Err(e) => self.show_toast(ToastKind::Error, e.to_string()),
                }
                Vec::new()
            }
        }
    }

    fn sign_in(&mut self, user: AuthUser, message: &str) -> Vec<Task> {
        tracing::info!(email = %user.email, "signed in");
        self.user = Some(user);
        self.screen = Screen::Dashboard;
        self.login.reset();
        self.register.reset();
        self.show_toast(ToastKind::Success, message);
        self.load_page(1)
    }

    fn close_user_form(&mut self, message: &str) {
        if matches!(self.modal, Some(ModalState::UserForm { .. })) {
            self.modal = None;
        }
        self.show_toast(ToastKind::Success, message);
    }

    fn fail_user_form(&mut self, error: String) {
        if let Some(ModalState::UserForm { view, .. }) = self.modal.as_mut() {
            view.finish_submit(Some(error.clone()));
        }
        self.show_toast(ToastKind::Error, error);
    }
}
