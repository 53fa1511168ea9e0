use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

use crate::config::Settings;

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn default_log_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir().map(|home| home.join("Library/Logs"));
    #[cfg(not(target_os = "macos"))]
    let base = dirs::data_local_dir().or_else(|| dirs::home_dir().map(|p| p.join(".local/share")));

    base.map_or_else(fallback_log_dir, |base| base.join("tickermind").join("logs"))
}

pub fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("tickermind").join("logs")
}

/// Configured directory, or the platform default
pub fn log_dir(settings: &Settings) -> PathBuf {
    settings.log_dir.clone().unwrap_or_else(default_log_dir)
}

#[must_use]
pub fn active_log_dir() -> PathBuf {
    ACTIVE_LOG_DIR.get().cloned().unwrap_or_else(default_log_dir)
}

pub fn local_offset() -> time::UtcOffset {
    static OFFSET: OnceLock<time::UtcOffset> = OnceLock::new();
    *OFFSET.get_or_init(|| time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC))
}

fn writable_dir(preferred: PathBuf) -> PathBuf {
    if std::fs::create_dir_all(&preferred).is_ok() {
        return preferred;
    }
    let fallback = fallback_log_dir();
    _ = std::fs::create_dir_all(&fallback);
    fallback
}

/// Daily rolling file log; keep the returned guard alive until exit.
#[must_use]
pub fn init(settings: &Settings) -> impl Any {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let log_dir = writable_dir(log_dir(settings));
    _ = ACTIVE_LOG_DIR.set(log_dir.clone());

    let writer = match build_appender(&log_dir) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("Failed to initialize logging in {}: {err}", log_dir.display());
            std::process::exit(1);
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(writer);

    let timer = fmt::time::OffsetTime::new(
        local_offset(),
        time::format_description::well_known::Rfc3339,
    );
    let file_line = cfg!(debug_assertions);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_thread_ids(true)
        .with_file(file_line)
        .with_line_number(file_line)
        .with_writer(writer)
        .with_filter(tracing_subscriber::EnvFilter::new(&settings.log_filter));

    tracing_subscriber::registry().with(layer).init();
    guard
}

fn build_appender(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .filename_prefix("tickermind")
        .filename_suffix("log")
        .max_log_files(5)
        .rotation(Rotation::DAILY)
        .build(log_dir)
}
