//! Logging setup
//!
//! The interactive client owns the terminal, so its logs go to a daily
//! rolling file. Headless runs log to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "gated_explorer=info";

/// Keeps the non-blocking writer flushing; hold it until exit.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_file_logging(log_dir: &Path) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let appender = tracing_appender::rolling::daily(log_dir, "gated_explorer.log");
    let (writer, worker) = tracing_appender::non_blocking(appender);

    Registry::default()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .context("Failed to set tracing subscriber")?;

    Ok(LogGuard {
        _worker: Some(worker),
    })
}

pub fn init_stderr_logging() -> Result<LogGuard> {
    Registry::default()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("Failed to set tracing subscriber")?;

    Ok(LogGuard { _worker: None })
}
