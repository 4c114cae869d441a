//! Tracing subscriber that writes to stdout and to one log file per launch.
//!
//! Launch files live in `<app root>/logs`, are named after the launch time and only the newest
//! [`MAX_LOG_FILES`] are kept.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Maximum number of launch logs kept on disk.
pub const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "finclusion";
const LOG_FILE_SUFFIX: &str = "log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to prepare log directory: {0}")]
    LogDir(#[from] app_dirs::AppDirError),
    #[error("Failed to open launch log: {0}")]
    Appender(#[from] InitError),
    #[error("Failed to prune logs in {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber. Later calls return immediately.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init() -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app_dirs::logs_dir()?;
    let stem = launch_stem(now_local_or_utc());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    prune_launch_logs(&log_dir, MAX_LOG_FILES)?;

    let timer = local_timer();
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_timer(timer.clone()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!(
        "Logging to {}",
        log_dir.join(format!("{stem}.{LOG_FILE_SUFFIX}")).display()
    );
    Ok(())
}

/// File stem for a launch, e.g. `finclusion_2023-11-14_22-13-20`.
///
/// Falls back to the unix timestamp if the date cannot be formatted.
fn launch_stem(now: OffsetDateTime) -> String {
    const STEM_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now
        .format(STEM_FORMAT)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    format!("{LOG_FILE_PREFIX}_{stamp}")
}

/// Delete the oldest launch logs until at most `keep` remain. Other files are left alone.
fn prune_launch_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let prune_err = |source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let mut launches: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .map_err(prune_err)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_launch_log(path))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    launches.sort();
    let excess = launches.len().saturating_sub(keep);
    for (_, path) in launches.drain(..excess) {
        fs::remove_file(&path).map_err(prune_err)?;
    }
    Ok(())
}

fn is_launch_log(path: &Path) -> bool {
    path.is_file()
        && path.extension().and_then(|ext| ext.to_str()) == Some(LOG_FILE_SUFFIX)
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.starts_with(LOG_FILE_PREFIX))
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    #[test]
    fn launch_stem_encodes_time() {
        let fixed = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(launch_stem(fixed), "finclusion_2023-11-14_22-13-20");
    }

    #[test]
    fn prune_keeps_newest_launches_only() {
        let dir = tempdir().unwrap();
        for idx in 0..5 {
            fs::write(dir.path().join(format!("finclusion_{idx}.log")), "").unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        fs::write(dir.path().join("config.toml"), "").unwrap();
        fs::write(dir.path().join("other.log"), "").unwrap();

        prune_launch_logs(dir.path(), 3).unwrap();
        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![
                "config.toml",
                "finclusion_2.log",
                "finclusion_3.log",
                "finclusion_4.log",
                "other.log"
            ]
        );
    }

    #[test]
    fn prune_reports_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            prune_launch_logs(&missing, 3),
            Err(LoggingError::Prune { path, .. }) if path == missing
        ));
    }
}
