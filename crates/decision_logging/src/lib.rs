//! Shared logging utilities for decision schema binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "decision_schema=info,decision_cli=info";
const VERBOSE_LOG_FILTER: &str = "decision_schema=debug,decision_cli=debug";
const HOME_ENV: &str = "DECISION_SCHEMA_HOME";

/// Logging configuration shared by decision schema binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Directory for the daily log file; `None` logs to stderr only
    pub log_dir: Option<PathBuf>,
}

/// Initialize tracing with stderr output and an optional daily file.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the lifetime of the process so buffered file output is flushed.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            ensure_dir(dir)?;
            let appender =
                tracing_appender::rolling::daily(dir, format!("{}.log", sanitize_name(config.app_name)));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(resolve_filter(config.verbose));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(resolve_filter(config.verbose)),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn resolve_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    })
}

/// Get the home directory: `$DECISION_SCHEMA_HOME` or `~/.decision_schema`
pub fn decision_home() -> Option<PathBuf> {
    if let Ok(override_path) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(override_path));
    }
    dirs::home_dir().map(|home| home.join(".decision_schema"))
}

/// Get the default logs directory: `<home>/logs`
pub fn default_logs_dir() -> Option<PathBuf> {
    decision_home().map(|home| home.join("logs"))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
