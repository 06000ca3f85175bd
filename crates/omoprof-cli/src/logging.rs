//! Logging initialization and log file management.
//!
//! Plain subcommands log to stderr. The TUI owns the terminal, so it logs to
//! a daily file under `<omoprof home>/logs/` instead. The filter comes from
//! `OMOPROF_LOG`, then `RUST_LOG`.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "OMOPROF_LOG";

/// Maximum age of log files before cleanup, in days.
const LOG_RETENTION_DAYS: u64 = 7;

const LOG_FILE_PREFIX: &str = "omoprof";
const LOG_FILE_SUFFIX: &str = "log";

/// Build the filter from `OMOPROF_LOG`, then `RUST_LOG`, then `default`.
fn env_filter(default: &str) -> EnvFilter {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Initialize stderr logging for subcommands.
///
/// Only warnings are shown unless a filter is set, so command output stays
/// readable.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Initialize file logging for the TUI.
///
/// Returns the [`WorkerGuard`] that must be held for the lifetime of the
/// program to flush buffered logs.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the
/// subscriber cannot be installed.
pub fn init_file(log_dir: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = open_log_writer(log_dir)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter("info")),
        )
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(guard)
}

/// Create the log directory and a daily rolling writer.
fn open_log_writer(
    log_dir: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory: {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .with_context(|| format!("failed to open log file in {}", log_dir.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Remove `.log` files older than 7 days from `log_dir`.
///
/// Best effort: runs before logging is initialized, so problems are
/// reported on stderr and otherwise ignored.
pub fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let cutoff = SystemTime::now() - Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);

    for entry in entries.filter_map(std::result::Result::ok) {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(LOG_FILE_SUFFIX) {
            continue;
        }

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                eprintln!(
                    "warning: failed to read metadata for {}: {e}",
                    path.display()
                );
                continue;
            }
        };

        if modified < cutoff {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!(
                    "warning: failed to remove old log file {}: {e}",
                    path.display()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backdate(path: &Path, days: u64) {
        let then = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        filetime::set_file_mtime(path, filetime::FileTime::from_system_time(then)).unwrap();
    }

    #[test]
    fn test_cleanup_removes_only_old_logs() {
        let tmp = tempfile::tempdir().unwrap();

        let recent = tmp.path().join("omoprof.2026-10-15.log");
        let old = tmp.path().join("omoprof.2026-09-01.log");
        let notes = tmp.path().join("notes.txt");
        fs::write(&recent, "recent").unwrap();
        fs::write(&old, "old").unwrap();
        fs::write(&notes, "keep").unwrap();
        backdate(&old, 8);
        backdate(&notes, 30);

        cleanup_old_logs(tmp.path());

        assert!(recent.exists(), "recent log file should be preserved");
        assert!(!old.exists(), "old log file should be removed");
        assert!(notes.exists(), "non-.log files should not be removed");
    }

    #[test]
    fn test_cleanup_handles_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        cleanup_old_logs(&tmp.path().join("nope"));
    }

    #[test]
    fn test_open_log_writer_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("logs");
        let (_writer, _guard) = open_log_writer(&log_dir).unwrap();
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_open_log_writer_fails_under_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(open_log_writer(&file.join("logs")).is_err());
    }
}
