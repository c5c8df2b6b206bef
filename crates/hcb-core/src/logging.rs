use std::path::Path;

use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{config::LogSettings, errors::Error, Result};

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    file: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Flush and close the log file.
    pub fn shutdown(self) {
        tracing::debug!("logging shutdown");
        drop(self.file);
    }
}

/// Install the process-wide subscriber.
///
/// `RUST_LOG` overrides `settings.level` when set. Console output goes to stderr;
/// when `settings.file` is set, the same events are appended there as well.
/// An unusable log file or a second call fails with [`Error::Config`].
pub fn init(service_name: &str, settings: &LogSettings) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.level;
        EnvFilter::new(format!(
            "warn,hcb={level},hcb_core={level},hcb_hoge={level},{service_name}={level}"
        ))
    });

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, file_guard) = match &settings.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))?;

    Ok(LoggingGuard { file: file_guard })
}

/// Open `path` for appending behind a non-blocking writer.
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let name = path.file_name().ok_or_else(|| {
        Error::Config(format!("BOT_LOG_FILE has no file name: {}", path.display()))
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| {
            Error::Config(format!("cannot open BOT_LOG_FILE {}: {e}", path.display()))
        })?;

    Ok(tracing_appender::non_blocking(appender))
}
