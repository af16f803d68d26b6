//! reqres-admin binary entry point.
//!
//! Parses flags, sets up file logging, wires the services onto a tokio
//! runtime, then runs the TUI event loop and restores the terminal on exit.
//!
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use reqres_admin::api::HttpClient;
use reqres_admin::api::auth::{AuthApi, AuthService, AuthStorage};
use reqres_admin::api::users::UserService;
use reqres_admin::app::keymap::Keymap;
use reqres_admin::app::settings::{SETTINGS_FILE, Settings};
use reqres_admin::app::tasks::{Services, TaskRunner};
use reqres_admin::app::{self, AppState};
use reqres_admin::error::{Context, Result};
use reqres_admin::store::{self, NullStore, SharedStore};

#[derive(Parser, Debug)]
#[command(name = "reqres-admin", version, about)]
struct Args {
    /// API root; overrides `base_url` in the settings file.
    #[arg(long)]
    base_url: Option<String>,
    /// Value for the `x-api-key` header.
    #[arg(long, env = "REQRES_API_KEY")]
    api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Directory holding the session file.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Keep the session in memory only.
    #[arg(long)]
    no_store: bool,
    /// Where log output goes; the terminal belongs to the UI.
    #[arg(long, default_value = "reqres-admin.log")]
    log_file: PathBuf,
    #[arg(long, default_value = SETTINGS_FILE)]
    config: String,
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("init tracing: {e}"))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn open_session_store(args: &Args, settings: &Settings) -> SharedStore {
    if args.no_store || !settings.persist_session {
        tracing::info!("session persistence disabled");
        return Arc::new(NullStore);
    }
    let dir = args.data_dir.clone().or_else(store::default_data_dir);
    store::open_store(dir.as_deref())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut settings = Settings::load_or_init(&args.config);
    if let Some(url) = &args.base_url {
        settings.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(key) = &args.api_key {
        settings.api_key = key.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.timeout_secs = secs.max(1);
    }
    tracing::info!(base_url = %settings.base_url, timeout_secs = settings.timeout_secs, "starting");

    let runtime = tokio::runtime::Runtime::new().with_ctx(|| "create tokio runtime".to_string())?;
    let client = HttpClient::new(settings.api_config());
    let storage = AuthStorage::new(open_session_store(&args, &settings));
    let auth = Arc::new(AuthService::new(client.clone(), storage));
    let session = auth.restore_session();
    let services = Services { auth, users: Arc::new(UserService::new(client)) };
    let runner = TaskRunner::new(runtime.handle().clone(), services);

    let keymap = Keymap::load_or_init(&args.keybinds);
    let state = AppState::new(session, keymap, settings.toast_duration());

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, state, runner);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
