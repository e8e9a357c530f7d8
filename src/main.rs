mod api;
mod app;
mod auth;
mod config;
mod event;
mod notification;
mod resource;
mod ui;

/// Version injected at compile time via LENSCRAFT_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("LENSCRAFT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

use anyhow::{Context, Result};
use api::client::ApiClient;
use app::App;
use auth::{AuthService, FileSessionStore, MemorySessionStore, SessionStore, StaticCredentialAuth};
use clap::{Parser, ValueEnum};
use config::Config;
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use ui::splash::{render as render_splash, SplashState};

const STARTUP_STEPS: usize = 4;

/// Terminal admin console for the Asha LensCraft studio
#[derive(Parser, Debug)]
#[command(name = "lenscraft", version, about, long_about = None)]
struct Args {
    /// Base URL of the studio REST API (overrides env and config)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Forget any stored session and show the login screen
    #[arg(long)]
    logout: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_path: &std::path::Path,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("lenscraft started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(dir) = config::config_dir() {
        return dir.join("lenscraft.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".lenscraft").join("lenscraft.log");
    }
    PathBuf::from("lenscraft.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = get_log_path();
    let _log_guard = setup_logging(args.log_level, &log_path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(app)) => {
            let mut app = app
                .with_config_path(Config::config_path())
                .with_log_path(Some(log_path));
            let run_result = run_app(&mut terminal, &mut app);
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Build the auth service, falling back to an in-memory session when
/// there is no config directory to persist into.
fn build_auth(config: &Config, forget_session: bool) -> Box<dyn AuthService + Send> {
    let credentials = config.credentials();
    if credentials.is_none() {
        tracing::warn!("No operator credentials configured; login will be refused");
    }

    match FileSessionStore::default_location() {
        Some(store) => {
            if forget_session {
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to clear stored session: {}", e);
                }
            }
            Box::new(StaticCredentialAuth::new(credentials, store))
        },
        None => {
            tracing::warn!("No config directory; session will not persist");
            Box::new(StaticCredentialAuth::new(
                credentials,
                MemorySessionStore::default(),
            ))
        },
    }
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new(STARTUP_STEPS);

    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    // Step 1: Load configuration
    splash.set_message("Loading configuration");
    terminal.draw(|f| render_splash(f, &splash))?;
    let config = Config::load();
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Resolve the API endpoint
    let api_url = config.effective_api_url(args.api_url.as_deref());
    tracing::info!("Using API: {}", api_url);
    splash.set_message(&format!("Connecting to {}", api_url));
    terminal.draw(|f| render_splash(f, &splash))?;

    let client = match ApiClient::new(&api_url, config.effective_token()) {
        Ok(client) => client,
        Err(e) => {
            splash.set_message(&format!("Error: {}", e));
            terminal.draw(|f| render_splash(f, &splash))?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            return Err(e);
        },
    };
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: Restore session
    splash.set_message("Restoring session");
    terminal.draw(|f| render_splash(f, &splash))?;
    let auth = build_auth(&config, args.logout);
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 4: Sections
    splash.set_message("Preparing sections");
    terminal.draw(|f| render_splash(f, &splash))?;
    let sections = resource::section::rest_sections(&client)?;
    splash.complete_step();

    splash.set_message("Ready!");
    terminal.draw(|f| render_splash(f, &splash))?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(Some(App::new(config, api_url, auth, sections)))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app)? {
            return Ok(());
        }
    }
}
