//! cycl3 - A terminal user interface for Bluesky.
//!
//! This application provides a fast, keyboard-driven interface for reading
//! your timeline, posting and finding people on Bluesky.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cycl3_core::{Config, CredentialStore, Feed, Gateway, Route, SessionStore, XrpcClient};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "cycl3.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in the cache directory so they never draw over the UI.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if std::fs::create_dir_all(log_dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

fn print_usage() {
    eprintln!("Usage: cycl3 [OPTION]");
    eprintln!();
    eprintln!("  (no option)         Start the terminal UI");
    eprintln!("  --open <path>       Start the terminal UI on a route (/, /messages, /functions)");
    eprintln!("  --login             Sign in from the command line");
    eprintln!("  --logout            Forget the saved session");
    eprintln!("  --timeline [term]   Print the timeline, optionally filtered");
    eprintln!("  --post <text>       Publish a post");
    eprintln!("  --help              Show this message");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load().unwrap_or_default();
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let _log_guard = init_tracing(&cache_dir);

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some("--login") => return cli_login(config, cache_dir).await,
        Some("--logout") => return cli_logout(config, cache_dir),
        Some("--timeline") => {
            let term = args.get(2).cloned().unwrap_or_default();
            return cli_timeline(config, cache_dir, term).await;
        }
        Some("--post") => {
            let text = args[2..].join(" ");
            return cli_post(config, cache_dir, text).await;
        }
        Some("--open") => {
            let route = args.get(2).map(|p| Route::from_path(p)).unwrap_or(Route::Feed);
            return run_tui(route).await;
        }
        Some(other) => {
            print_usage();
            bail!("Unknown option: {}", other);
        }
        None => {}
    }

    run_tui(Route::Feed).await
}

async fn run_tui(initial_route: Route) -> Result<()> {
    info!("cycl3 starting");

    // Create app
    let mut app = App::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First frame shows the loading state while the session is looked up
    terminal.draw(|f| render(f, &app))?;
    app.resolve_session();
    app.navigate(initial_route);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("cycl3 shutting down");
    Ok(())
}

// ============================================================================
// Command-line modes
// ============================================================================

fn build_gateway(config: &Config, cache_dir: PathBuf) -> Result<Gateway<XrpcClient>> {
    let client = XrpcClient::new(&config.service_url)?;
    Ok(Gateway::new(client, SessionStore::new(cache_dir)))
}

/// Gateway with the saved session, or an error telling the user to sign in
fn signed_in_gateway(config: &Config, cache_dir: PathBuf) -> Result<Gateway<XrpcClient>> {
    let mut gateway = build_gateway(config, cache_dir)?;
    if !gateway.restore() {
        bail!("No saved session. Run `cycl3 --login` first.");
    }
    Ok(gateway)
}

async fn cli_login(mut config: Config, cache_dir: PathBuf) -> Result<()> {
    let mut gateway = build_gateway(&config, cache_dir)?;

    let identifier = match std::env::var(app::IDENTIFIER_ENV_VAR) {
        Ok(id) if !id.trim().is_empty() => id,
        _ => {
            eprint!("Handle or email: ");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin()
                .read_line(&mut line)
                .context("Failed to read identifier")?;
            line.trim().to_string()
        }
    };
    let password = match std::env::var(app::PASSWORD_ENV_VAR) {
        Ok(pw) if !pw.is_empty() => pw,
        _ => rpassword::prompt_password("App password: ").context("Failed to read password")?,
    };

    let session = gateway.login(&identifier, &password).await?;

    if let Err(e) = CredentialStore::store(&identifier, &password) {
        warn!(error = %e, "Failed to store credentials");
    }
    config.last_identifier = Some(identifier);
    config.save()?;

    println!("Signed in as @{}", session.handle);
    Ok(())
}

fn cli_logout(config: Config, cache_dir: PathBuf) -> Result<()> {
    let mut gateway = build_gateway(&config, cache_dir)?;
    gateway.restore();
    gateway.logout()?;
    if let Some(identifier) = &config.last_identifier {
        if let Err(e) = CredentialStore::forget(identifier) {
            warn!(error = %e, "Failed to remove stored password");
        }
    }
    println!("Signed out");
    Ok(())
}

async fn cli_timeline(config: Config, cache_dir: PathBuf, term: String) -> Result<()> {
    let gateway = signed_in_gateway(&config, cache_dir)?;

    let mut feed = Feed::new();
    feed.search_term = term;
    feed.refresh(&gateway).await;

    if let Some(error) = &feed.error {
        bail!("{}", error);
    }

    let posts = feed.filtered();
    if posts.is_empty() {
        println!("{}", feed.empty_message());
        return Ok(());
    }

    for post in posts {
        println!("{}  {}", post.author_display(), post.formatted_time());
        for line in post.text.lines() {
            println!("  {}", line);
        }
        for image in &post.images {
            println!("  [image: {}] {}", image.alt_display(), image.proxied_thumb());
        }
        println!();
    }
    Ok(())
}

async fn cli_post(config: Config, cache_dir: PathBuf, text: String) -> Result<()> {
    let gateway = signed_in_gateway(&config, cache_dir)?;

    let mut feed = Feed::new();
    feed.draft = text;
    if feed.take_submission().is_none() {
        bail!("Nothing to post");
    }

    if !feed.submit(&gateway).await {
        bail!("{}", feed.error.as_deref().unwrap_or(cycl3_core::feed::POST_ERROR));
    }

    println!("Posted. Timeline now has {} posts.", feed.posts().len());
    Ok(())
}

// ============================================================================
// Event loop
// ============================================================================

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
