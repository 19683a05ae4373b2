//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `foliosync.log` under
//! `$FOLIOSYNC_LOG_DIR` (default `./logs`), rotating previous sessions on
//! startup and keeping nine of them.

use crate::error::{FolioError, Result, StringError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable overriding the log directory
pub const LOG_DIR_ENV_VAR: &str = "FOLIOSYNC_LOG_DIR";

/// Base name of the log file
const LOG_FILE_PREFIX: &str = "foliosync";

/// Maximum number of historical log files to keep (foliosync.log.1 through foliosync.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Directory the log file is written to
pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV_VAR).map_or_else(|| PathBuf::from("logs"), PathBuf::from)
}

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(format!("{LOG_FILE_PREFIX}.log"));
    rotate_logs_on_startup(&log_path)?;

    // Session rotation is handled above; the appender only writes
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| FolioError::LoggingError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| FolioError::LoggingError(Box::new(e)))?;

    tracing::info!(
        "foliosync v{} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_path.display()
    );

    Ok(())
}

/// Shift `foliosync.log` to `foliosync.log.1`, `.1` to `.2` and so on,
/// deleting the oldest session. Runs on every startup regardless of size.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| FolioError::LoggingError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| FolioError::LoggingError(StringError::new("Invalid log filename")))?
        .to_string_lossy();
    let numbered = |n: u8| log_dir.join(format!("{log_name}.{n}"));

    let oldest = numbered(MAX_LOG_FILES);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current = numbered(i);
        if current.exists() {
            std::fs::rename(&current, numbered(i + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;

    fn session_log(dir: &Path) -> PathBuf {
        dir.join("foliosync.log")
    }

    #[test]
    fn test_rotation_moves_current_log() {
        let temp_dir = create_test_dir();
        let log_path = session_log(temp_dir.path());
        fs::write(&log_path, "first session").unwrap();

        rotate_logs_on_startup(&log_path).unwrap();

        assert!(!log_path.exists());
        let rotated = fs::read_to_string(temp_dir.path().join("foliosync.log.1")).unwrap();
        assert_eq!(rotated, "first session");
    }

    #[test]
    fn test_rotation_keeps_nine_sessions() {
        let temp_dir = create_test_dir();
        let log_path = session_log(temp_dir.path());

        for session in 1..=12 {
            fs::write(&log_path, format!("session {session}")).unwrap();
            rotate_logs_on_startup(&log_path).unwrap();
        }

        for i in 1..=MAX_LOG_FILES {
            assert!(temp_dir.path().join(format!("foliosync.log.{i}")).exists());
        }
        assert!(!temp_dir.path().join("foliosync.log.10").exists());

        let newest = fs::read_to_string(temp_dir.path().join("foliosync.log.1")).unwrap();
        let oldest = fs::read_to_string(temp_dir.path().join("foliosync.log.9")).unwrap();
        assert_eq!(newest, "session 12");
        assert_eq!(oldest, "session 4");
    }

    #[test]
    fn test_rotation_with_gaps() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path();
        let log_path = session_log(dir);
        fs::write(&log_path, "current").unwrap();
        fs::write(dir.join("foliosync.log.1"), "previous").unwrap();
        fs::write(dir.join("foliosync.log.5"), "old").unwrap();

        rotate_logs_on_startup(&log_path).unwrap();

        assert_eq!(fs::read_to_string(dir.join("foliosync.log.1")).unwrap(), "current");
        assert_eq!(fs::read_to_string(dir.join("foliosync.log.2")).unwrap(), "previous");
        assert_eq!(fs::read_to_string(dir.join("foliosync.log.6")).unwrap(), "old");
        assert!(!dir.join("foliosync.log.5").exists());
    }

    #[test]
    fn test_rotation_without_existing_log() {
        let temp_dir = create_test_dir();
        let log_path = session_log(temp_dir.path());

        rotate_logs_on_startup(&log_path).unwrap();
        assert!(!temp_dir.path().join("foliosync.log.1").exists());
    }
}
