//! Append-only writer for the day-stamped log files

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::logging::clock::{Clock, SystemClock};
use crate::logging::timestamp::{date_tag, time_tag};

#[derive(Error, Debug)]
pub enum LogWriteError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to append to {path}: {source}")]
    Append { path: PathBuf, source: io::Error },
}

/// Destination file family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sink {
    /// `<date>-log.log`, probe successes
    Log,
    /// `<date>-error.log`, probe failures
    Error,
}

impl Sink {
    fn suffix(&self) -> &'static str {
        match self {
            Sink::Log => "log",
            Sink::Error => "error",
        }
    }

    /// File name for the given date tag
    pub fn file_name(&self, date: &str) -> String {
        format!("{}-{}.log", date, self.suffix())
    }
}

/// Writes `[HH:MM:SS.mmm] <text>` lines into the log directory
pub struct LogWriter {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl LogWriter {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    /// Writer stamped by the wall clock
    pub fn with_system_clock(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, Arc::new(SystemClock))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the log directory. An existing directory is not an error.
    pub fn ensure_dir(&self) -> Result<(), LogWriteError> {
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(LogWriteError::CreateDir {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    /// Path of today's file for a sink
    pub fn current_path(&self, sink: Sink) -> PathBuf {
        self.dir.join(sink.file_name(&date_tag(&self.clock.now())))
    }

    /// Append one line to today's file for `sink`, returning the file written
    pub fn write(&self, sink: Sink, text: &str) -> Result<PathBuf, LogWriteError> {
        self.ensure_dir()?;

        // Both tags come from one reading so a line never straddles midnight
        let now = self.clock.now();
        let path = self.dir.join(sink.file_name(&date_tag(&now)));
        let line = format!("{} {}\n", time_tag(&now), text);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogWriteError::Append {
                path: path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| LogWriteError::Append {
                path: path.clone(),
                source,
            })?;

        debug!("Appended {} bytes to {}", line.len(), path.display());
        Ok(path)
    }
}
