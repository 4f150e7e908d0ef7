//! dropgate - log in to a file drop server and upload a file from the terminal.
//!
//! `dropgate login` stores a session token; `dropgate upload <file>` sends
//! the file with it. Logs go to `dropgate.log` in the cache directory.

mod app;
mod cli;
mod probe;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dropgate_core::config::Config;

use app::App;
use cli::{Cli, Command};
use ui::FlowState;

/// Log file name inside the cache directory
const LOG_FILE: &str = "dropgate.log";

/// Exit status when the attempt stopped at the login redirect
const EXIT_NEEDS_LOGIN: u8 = 2;

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
fn init_tracing(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        Err(_) => (None, None),
    };
    let stderr_layer = verbose.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter)
        .init();

    guard
}

fn exit_status(state: FlowState) -> u8 {
    match state {
        FlowState::Success => 0,
        FlowState::Idle => EXIT_NEEDS_LOGIN,
        _ => 1,
    }
}

fn exit_code(state: FlowState) -> ExitCode {
    ExitCode::from(exit_status(state))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let log_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let _guard = init_tracing(cli.verbose, &log_dir);
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let mut app = App::new(config, cli.server)?;
    info!(server = %app.base_url(), command = ?cli.command, "dropgate starting");

    let code = match cli.command {
        Command::Login { username, upload } => {
            let state = app.login(username).await?;
            match upload {
                Some(file) if state == FlowState::Success => exit_code(app.upload(&file).await?),
                _ => exit_code(state),
            }
        }
        Command::Upload { file } => exit_code(app.upload(&file).await?),
        Command::Logout => {
            app.logout()?;
            ExitCode::SUCCESS
        }
        Command::Status => {
            app.status()?;
            ExitCode::SUCCESS
        }
        Command::Probe => {
            if app.probe().await {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    Ok(code)
}
