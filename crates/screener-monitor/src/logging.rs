//! Logging setup.

use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use tracing_appender::non_blocking::WorkerGuard;

/// Setup logging with the given level.
///
/// `RUST_LOG` overrides `level`. With `file` set, events are also written
/// to that file without ANSI colours; keep the returned guard alive until
/// exit so buffered lines are flushed.
pub fn setup_logging(level: &str, json: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match file.map(file_writer) {
        Some(Ok((writer, guard))) => (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        ),
        Some(Err(e)) => {
            // The subscriber is not installed yet, so stderr is the only sink.
            eprintln!("warning: file logging disabled: {e}");
            (None, None)
        }
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().pretty())
            .init();
    }

    guard
}

fn file_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    let (dir, name) = split_log_path(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    std::fs::create_dir_all(&dir).map_err(|e| {
        io::Error::new(e.kind(), format!("cannot create {}: {e}", dir.display()))
    })?;
    let appender = tracing_appender::rolling::never(dir, name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Directory and file name of a log path; a bare name logs to the
/// working directory.
fn split_log_path(path: &Path) -> Option<(PathBuf, String)> {
    let name = path.file_name()?.to_str()?.to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("logs/screener.log")),
            Some((PathBuf::from("logs"), "screener.log".to_string()))
        );
        assert_eq!(
            split_log_path(Path::new("screener.log")),
            Some((PathBuf::from("."), "screener.log".to_string()))
        );
        assert_eq!(split_log_path(Path::new("/")), None);
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.log");

        let writer = file_writer(&path);
        assert!(writer.is_ok());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_file_writer_reports_unusable_paths() {
        let err = file_writer(Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        // A regular file where the log directory should be
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = file_writer(&blocker.join("run.log")).unwrap_err();
        assert!(err.to_string().contains("cannot create"));
    }
}
