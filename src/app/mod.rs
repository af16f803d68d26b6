//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod avatar;
pub mod form_view;
pub mod keymap;
pub mod settings;
pub mod tasks;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};

use crate::api::auth::AuthUser;
use crate::api::users::User;
use crate::rules::login::{LoginField, LoginForm, login_rules};
use crate::rules::register::{RegisterField, RegisterForm, register_rules};
use crate::rules::user::{UserForm, user_rules};
use form_view::FormView;

/// Top-level screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
}

/// Which form the auth screen shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthTab {
    SignIn,
    SignUp,
}

/// Color palette for the TUI (Catppuccin Mocha).
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub focus: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            focus: Color::Rgb(0x89, 0xb4, 0xfa),        // blue
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification shown in the status bar.
#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserFormMode {
    Create,
    Edit { id: u64 },
}

/// Dialogs over the dashboard.
#[derive(Clone, Debug)]
pub enum ModalState {
    UserForm {
        mode: UserFormMode,
        view: FormView<UserForm>,
    },
    DeleteConfirm {
        user: User,
        /// 0 = Delete, 1 = Cancel
        selected: usize,
        submitting: bool,
    },
    Help,
}

pub struct AppState {
    pub started_at: Instant,
    pub screen: Screen,
    pub auth_tab: AuthTab,
    pub login: FormView<LoginForm>,
    pub register: FormView<RegisterForm>,
    pub user: Option<AuthUser>,
    pub users: Vec<User>,
    pub page: u32,
    pub total_pages: u32,
    pub selected_user_index: usize,
    pub loading: bool,
    pub list_error: Option<String>,
    pub logging_out: bool,
    pub modal: Option<ModalState>,
    pub toast: Option<Toast>,
    pub toast_ttl: Duration,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub should_quit: bool,
}

impl AppState {
    /// Start on the dashboard when a stored session exists, else on sign-in.
    pub fn new(session: Option<AuthUser>, keymap: keymap::Keymap, toast_ttl: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            screen: if session.is_some() { Screen::Dashboard } else { Screen::Auth },
            auth_tab: AuthTab::SignIn,
            login: new_login_view(),
            register: new_register_view(),
            user: session,
            users: Vec::new(),
            page: 1,
            total_pages: 1,
            selected_user_index: 0,
            loading: false,
            list_error: None,
            logging_out: false,
            modal: None,
            toast: None,
            toast_ttl,
            theme: Theme::mocha(),
            keymap,
            should_quit: false,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_user_index)
    }

    pub fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast { kind, message: message.into(), shown_at: Instant::now() });
    }

    /// Drop the toast once it has been visible for `toast_ttl`.
    pub fn expire_toast(&mut self) {
        if let Some(t) = &self.toast {
            if t.shown_at.elapsed() >= self.toast_ttl {
                self.toast = None;
            }
        }
    }
}

pub fn new_login_view() -> FormView<LoginForm> {
    FormView::new(LoginForm::default(), login_rules()).with_masked(&[LoginField::Password])
}

pub fn new_register_view() -> FormView<RegisterForm> {
    FormView::new(RegisterForm::default(), register_rules())
        .with_masked(&[RegisterField::Password, RegisterField::ConfirmPassword])
}

pub fn new_user_view(initial: UserForm) -> FormView<UserForm> {
    FormView::new(initial, user_rules())
}

/// Look for `name` in the platform config directory.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let dirs = directories::ProjectDirs::from("", "", "reqres-admin")?;
    let candidate = dirs.config_dir().join(name);
    candidate
        .exists()
        .then(|| candidate.to_string_lossy().to_string())
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
