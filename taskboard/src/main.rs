//! `taskboard`: terminal client for a remote task-management API.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Against the hosted service
//! TASKBOARD_AUTH_TOKEN=... cargo run --bin taskboard
//!
//! # Against a local mock server
//! cargo run --bin taskboard-mock -- --auth-token dev &
//! cargo run --bin taskboard -- --api-url http://127.0.0.1:8080 --auth-token dev
//! ```

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::http::HttpTaskApi;
use taskboard::app::App;
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::net::{self, NetCommand, NetEvent};
use taskboard::ui;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; the terminal belongs to ratatui.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let api = match build_api(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("taskboard: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(api_url = %api.base_url(), "taskboard starting");

    match run(api, &config) {
        Ok(()) => {
            tracing::info!("taskboard exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "terminal error");
            eprintln!("taskboard: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_api(config: &ClientConfig) -> Result<HttpTaskApi, Box<dyn std::error::Error>> {
    let url = config.api_url()?;
    let token = config.auth_token()?;
    Ok(HttpTaskApi::new(url.as_str(), token)?)
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Sets up the terminal, runs the loop, and restores the terminal.
fn run(api: HttpTaskApi, config: &ClientConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, api, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: HttpTaskApi,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new().with_notice_timeout(config.notice_timeout);
    let (cmd_tx, mut evt_rx) = net::spawn_net(Arc::new(api), config.channel_capacity);

    let initial = app.request_load();
    dispatch(&mut app, &cmd_tx, initial);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending NetEvents (non-blocking).
        drain_net_events(&mut app, &mut evt_rx);

        // Step 3: Expire notices.
        app.tick();

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(cmd) = app.handle_key_event(key) {
                dispatch(&mut app, &cmd_tx, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(NetCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hands a command to the network worker.
fn dispatch(app: &mut App, tx: &mpsc::Sender<NetCommand>, cmd: NetCommand) {
    match tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(cmd) | mpsc::error::TrySendError::Closed(cmd)) => {
            tracing::warn!(?cmd, "network worker unavailable, command dropped");
            app.notify(taskboard::tasks::Notice::Failed);
        }
    }
}

/// Drain all pending `NetEvent`s from the receiver and apply them to the app.
fn drain_net_events(app: &mut App, rx: &mut mpsc::Receiver<NetEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.apply_net_event(event);
    }
}
