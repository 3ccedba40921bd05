//! Logging bootstrap built on `tracing-subscriber` and `tracing-appender`.
//!
//! The crate itself only emits `tracing` events; the embedding host decides
//! where they go. Two bootstrap helpers are provided:
//! - **Daemon** ([`init_daemon`]): JSON file layer (daily rotation) plus a
//!   console layer, for long-running bot hosts
//! - **Console** ([`init_console`]): stderr only, for one-shot tooling
//!
//! Both read the `RUST_LOG` environment variable (default: `info`). Call
//! exactly one of them, once, at process start.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name prefix for rotated daemon logs.
const LOG_FILE_PREFIX: &str = "slackline.log";

/// Keeps the background log writer alive.
///
/// Hold this for the whole process lifetime. Dropping it flushes whatever
/// the non-blocking writer still has buffered and closes the log file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initialise logging for a long-running bot host.
///
/// Writes JSON logs to `{logs_dir}/slackline.log.YYYY-MM-DD` with daily
/// rotation and mirrors human-readable output to stderr.
///
/// Returns a [`LoggingGuard`] that must be kept alive for log flushing.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber was already installed.
pub fn init_daemon(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!("cannot create logs directory {}: {e}", logs_dir.display())
    })?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise minimal stderr-only logging for one-shot tooling.
///
/// A second initialisation in the same process is a no-op.
pub fn init_console() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
