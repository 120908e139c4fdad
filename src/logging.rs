//! Tracing subscriber setup shared by both binaries.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::config::Settings;

/// Install the global subscriber.
///
/// Output goes to `settings.log_file` or stdout per [`crate::config::LogMode`],
/// through a non-blocking writer and the log sanitizer. The filter comes from
/// `RUST_LOG`, defaulting to `info`. Keep the returned guard alive for the
/// life of the process so buffered lines are flushed.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init(settings: &Settings, interactive: bool) -> io::Result<WorkerGuard> {
    let (writer, guard) = if settings.log_mode.use_file(interactive) {
        if let Some(parent) = settings.log_file.parent() {
            // A missing directory surfaces as an open error below.
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}
