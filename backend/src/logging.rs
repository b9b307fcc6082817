//! Structured logging with tracing
//!
//! Events go to stdout in human-readable form and to an append-only log file as
//! JSON records. The file is written through a non-blocking, lossy writer, so
//! a stalled sink drops lines instead of holding up requests.

use anyhow::{Context, Result};
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Open the configured log file for appending and wrap it in a background writer
///
/// The returned guard flushes pending lines when dropped and must be held for
/// as long as logging is needed.
pub fn file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("Failed to create log directory {}", config.dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config.file.clone())
        .build(&config.dir)
        .with_context(|| format!("Failed to open log file {}", config.file))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// JSON layer used for the log file: one key/value record per event
pub fn json_file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(config)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout = fmt::layer().with_target(true);

    Registry::default()
        .with(filter)
        .with(stdout)
        .with(json_file_layer(writer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(
        "Logging initialized: level {}, file {}",
        config.level,
        config.dir.join(&config.file).display()
    );
    Ok(guard)
}
