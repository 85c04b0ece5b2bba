//! Logging initialization and configuration.
//!
//! Logs are written to files so the interactive prompt on stdout stays clean.
//! Each run gets its own timestamped file.
//!
//! # Configuration
//!
//! The log level can be controlled via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - Show debug and higher level logs (one line per dispatch)
//! - `RUST_LOG=info` - Show info and higher level logs (default)
//! - `RUST_LOG=warn` - Show timeouts and probe failures only
//! - `RUST_LOG=error` - Show errors only
//!
//! The directory comes from [`Config::log_dir`](crate::config::Config), and
//! defaults to `logs/` beside the executable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `logs/` next to the running executable, or relative to the cwd as a fallback.
pub fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// File name for a run started now, e.g. `rusty-webterm.2024-12-06-14-30-25.log`.
fn log_file_name() -> String {
    format!("rusty-webterm.{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize the logging system and return the path of the log file.
///
/// The log level is controlled by the `RUST_LOG` environment variable,
/// defaulting to `info` if not set.
pub fn init_logging(log_dir: Option<&Path>) -> Result<PathBuf> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(log_file_name());
    let log_file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    // The writer must outlive every log call, so the guard lives until exit.
    std::mem::forget(guard);

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Ok(log_path)
}
