//! gatekeep - walk a set of protected routes from the terminal.
//!
//! Log in as one of the demo accounts, visit pages, and watch the route
//! guards redirect you. The session survives restarts until its token
//! expires.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gatekeep_core::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use ui::input::handle_command;

/// Log file name in cache directory
const LOG_FILE: &str = "gatekeep.log";

/// Initialize the tracing subscriber for logging.
/// Logs go to a file so they never interleave with the prompt.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            Config::default()
        }
    };
    let cache_dir = Config::cache_dir().unwrap_or_else(|_| "./cache".into());

    let _log_guard = init_tracing(&cache_dir)?;
    info!("gatekeep starting");

    let mut app = App::new(config, cache_dir);
    println!("{}", ui::render::banner());
    let initial = app.navigator.location().to_string();
    app.go(&initial);
    println!("{}", ui::render::render(&mut app).await);

    let result = run_app(&mut app).await;

    app.session.shutdown();
    if let Err(ref e) = result {
        warn!(error = %e, "Exited with error");
        eprintln!("Error: {}", e);
    }

    info!("gatekeep shutting down");
    result
}

async fn run_app(app: &mut App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session_rx = app.session.subscribe();

    loop {
        print!("{}", ui::render::prompt(app));
        io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!();
                    return Ok(());
                };
                if handle_command(app, &line).await? {
                    return Ok(());
                }
            }
            changed = session_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = session_rx.borrow_and_update().clone();
                if app.on_session_change(&state) {
                    println!();
                    println!("{}", ui::render::render(app).await);
                }
            }
        }
    }
}
