//! Tracing setup: stderr always, a non-blocking log file on request.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;

const LOG_FILE: &str = "atb.log";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = || env_filter(directives.as_deref());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    if !config.file_logging {
        tracing_subscriber::registry().with(stderr_layer).init();
        report_ignored(config);
        return Ok(None);
    }

    let dir = config.log_dir.clone().unwrap_or_else(log_dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    report_ignored(config);
    tracing::info!(path = %dir.join(LOG_FILE).display(), "file logging enabled");

    Ok(Some(guard))
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn report_ignored(config: &LoggingConfig) {
    for (key, value) in &config.ignored {
        tracing::warn!(key, %value, "ignoring unparsable environment variable");
    }
}

/// Platform log directory, or `/tmp/atb/logs` when none can be determined.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "atb")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/atb/logs"))
}
