//! Tracing setup: stderr for warnings, an optional log file for the rest.
//!
//! The file is written to `~/.config/winmover/logs/winmover.log` when
//! enabled in `config.toml`. `RUST_LOG` overrides the configured level.

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_NAME: &str = "winmover.log";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
        }
    }
}

/// Keeps the log file writer alive; flushes on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard(Option<WorkerGuard>);

impl LogGuard {
    pub fn is_writing_file(&self) -> bool {
        self.0.is_some()
    }
}

/// Builds the level filter for the file layer.
fn file_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Call once at startup.
///
/// The returned guard must be held for the lifetime of the process. File
/// logging is skipped when disabled or when the log directory cannot be
/// created.
pub fn init(config: &LogConfig) -> LogGuard {
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    let (file, guard) = match file_writer(config) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter(&config.level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // A second init (tests, nested commands) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .try_init();
    LogGuard(guard)
}

fn file_writer(
    config: &LogConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if !config.enabled {
        return None;
    }
    let dir = crate::config::logs_dir()?;
    fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    Some(tracing_appender::non_blocking(appender))
}
