//! Structured logging using tracing.
//!
//! Logs to `~/.local/state/pomotimer/pomotimer.{date}.log` with daily rotation,
//! keeping 7 days. The level can be set with `RUST_LOG`.
//!
//! The terminal is owned by the UI, so when the log file cannot be created
//! events are discarded instead of written to stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app_dirs::AppDirs;

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// events get flushed.
pub fn init() -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pomotimer=info"));

    let appender = AppDirs::log_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir).ok()?;
        create_file_appender(&dir).ok()
    });

    match appender {
        Some(file_appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(false),
                )
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::sink).with_ansi(false))
                .try_init();
            None
        }
    }
}

fn create_file_appender(
    dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pomotimer")
        .filename_suffix("log")
        .max_log_files(7)
        .build(dir)
}
