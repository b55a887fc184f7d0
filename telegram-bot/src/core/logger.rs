//! Logging initialization: human-readable lines on the console, JSON lines in the `LOG_FILE` file.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Local time in `YYYY-MM-DD HH:MM:SS` for human-readable log lines.
struct ChronoLocal;

impl FormatTime for ChronoLocal {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let t = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(w, "{} ", t)
    }
}

/// Initializes the global tracing subscriber.
///
/// Console output is `YYYY-MM-DD HH:MM:SS LEVEL [target] message key=value ...`. The file at
/// `log_file_path` (created if missing, appended otherwise) gets one JSON object per event. Level
/// from `RUST_LOG` (e.g. `info`, `debug`); default `info`. Load `.env` before calling.
///
/// Keep the returned guard alive until exit; dropping it flushes and stops the file writer.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<WorkerGuard> {
    let path = Path::new(log_file_path);
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("LOG_FILE has no file name: {}", log_file_path))?;
    std::fs::create_dir_all(&directory)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(&directory)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_format = tracing_subscriber::fmt::format()
        .with_timer(ChronoLocal)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .event_format(console_format)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_target(true)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(guard)
}
