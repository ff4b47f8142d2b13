use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "doc_versions=info";

/// Where log lines go
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

/// Install the global subscriber
///
/// The returned guard flushes the non-blocking writer on drop and must be
/// kept alive for the lifetime of the process.
pub fn init(target: LogTarget<'_>) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match target {
        LogTarget::File(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .context("log path has no file name")?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
