//! Logging setup.
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured level. Output goes to stderr, or to a file through a
//! non-blocking writer whose guard must be kept alive until exit so
//! buffered lines are flushed.
//!
//! # Example
//!
//! ```ignore
//! let _guard = goldscout::logging::init("info", None)?;
//! tracing::info!("ready");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("log file path '{0}' has no file name")]
    NoFileName(PathBuf),

    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Keeps the file writer's background thread alive. Drop it last.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// `level` is any `EnvFilter` directive (`info`, `goldscout=debug`, ...)
/// and is ignored when `RUST_LOG` is set. With `file`, output is appended
/// to that file without ANSI colours.
pub fn init(level: &str, file: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(level)?,
    };

    let Some(path) = file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_timer(LocalTime::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;
        return Ok(LoggingGuard { _worker: None });
    };

    let (dir, name) = split_log_path(path)?;
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    let (writer, worker) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(LocalTime::rfc_3339())
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard {
        _worker: Some(worker),
    })
}

/// Parses a filter directive string.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        filter: level.to_string(),
        reason: e.to_string(),
    })
}

/// Splits a log file path into its directory (current directory if none)
/// and file name.
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let name = path
        .file_name()
        .ok_or_else(|| LoggingError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warn,goldscout::search=trace").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_bad_level() {
        let err = build_filter("goldscout=loudest").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/goldscout/run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/goldscout"));
        assert_eq!(name, PathBuf::from("run.log"));

        let (dir, name) = split_log_path(Path::new("run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("run.log"));
    }

    #[test]
    fn test_split_log_path_without_file_name() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::NoFileName(_))
        ));
    }
}
