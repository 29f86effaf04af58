//! Durable probe logging
//! Day-stamped append-only files: `<YYYY-MM-DD>-log.log` and `<YYYY-MM-DD>-error.log`

pub mod clock;
pub mod timestamp;
pub mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timestamp::{date_tag, time_tag};
pub use writer::{LogWriteError, LogWriter, Sink};

use std::path::PathBuf;
use tracing::debug;

/// Environment variable selecting the log directory
pub const LOG_DIR_ENV: &str = "ZCRM_TEST_LONG_LOG_DIR";

/// Resolve the log directory.
///
/// Order: `ZCRM_TEST_LONG_LOG_DIR`, the configured directory, the directory of
/// the running executable, the working directory.
pub fn resolve_log_dir(configured: Option<PathBuf>) -> PathBuf {
    let dir = std::env::var_os(LOG_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or(configured)
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
        })
        .unwrap_or_else(|| PathBuf::from("."));

    debug!("Log directory: {}", dir.display());
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::Mutex;

    // Tests in this module change the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_log_dir_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Option<OsString> = std::env::var_os(LOG_DIR_ENV);
        match value {
            Some(v) => std::env::set_var(LOG_DIR_ENV, v),
            None => std::env::remove_var(LOG_DIR_ENV),
        }
        let result = f();
        match saved {
            Some(v) => std::env::set_var(LOG_DIR_ENV, v),
            None => std::env::remove_var(LOG_DIR_ENV),
        }
        result
    }

    #[test]
    fn test_env_var_beats_configured_dir() {
        let dir = with_log_dir_env(Some("/env/logs"), || {
            resolve_log_dir(Some(PathBuf::from("/cfg/logs")))
        });
        assert_eq!(dir, PathBuf::from("/env/logs"));
    }

    #[test]
    fn test_empty_env_var_falls_back_to_configured_dir() {
        let dir = with_log_dir_env(Some(""), || resolve_log_dir(Some(PathBuf::from("/cfg/logs"))));
        assert_eq!(dir, PathBuf::from("/cfg/logs"));
    }

    #[test]
    fn test_unset_falls_back_to_executable_dir() {
        let dir = with_log_dir_env(None, || resolve_log_dir(None));
        let exe_dir = std::env::current_exe()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf();
        assert_eq!(dir, exe_dir);
    }
}
