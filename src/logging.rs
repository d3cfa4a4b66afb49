//! Process-wide logging.
//!
//! [`init`] is called once at startup. It installs a subscriber writing to
//! stderr and, optionally, appending to a log file, and returns a
//! [`Logging`] handle. The handle carries the [`Dispatch`] handed to the
//! engine and the file writer's guard: dropping it flushes pending entries,
//! so it must live until the process is about to exit.

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// What to log and where.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Default level; `RUST_LOG` overrides it.
    pub level: Level,
    /// Log file to append to, if any.
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Resolve settings from the merged configuration.
    pub fn from_config(config: &crate::config::Config, quiet: bool) -> Self {
        let level = if quiet {
            Level::ERROR
        } else if config.logging.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            level,
            file: config.log_file(),
        }
    }
}

/// Live logging state. Keep it alive until exit.
pub struct Logging {
    dispatch: Dispatch,
    _file_guard: Option<WorkerGuard>,
}

impl Logging {
    /// The installed dispatcher, for components that take an explicit sink.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

/// `2024-03-01 09:30:00,123` in local time.
struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S,%3f"))
    }
}

/// Install the global subscriber. Must be called at most once.
pub fn init(settings: &LogSettings) -> Result<Logging> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LogTimestamp)
        .with_target(false);

    let (file_layer, file_guard) = match settings.file {
        Some(ref path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_timer(LogTimestamp)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    let dispatch = Dispatch::new(subscriber);
    tracing::dispatcher::set_global_default(dispatch.clone())
        .context("Failed to install the log subscriber")?;

    Ok(Logging {
        dispatch,
        _file_guard: file_guard,
    })
}

/// Non-blocking appender for `path`, creating its directory if needed.
fn file_writer(path: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
