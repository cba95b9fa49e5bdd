/*!
 * Activity Log
 * Append-only record of every action and error, one line each
 */

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{ManagerError, Result};

const ERROR_PREFIX: &str = "ERROR: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Action(String),
    Error(String),
}

impl LogEntry {
    pub fn message(&self) -> &str {
        match self {
            LogEntry::Action(message) | LogEntry::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogEntry::Error(_))
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Action(message) => f.write_str(message),
            LogEntry::Error(message) => write!(f, "{}{}", ERROR_PREFIX, message),
        }
    }
}

pub trait ActivityLog: Send + Sync {
    fn append(&self, entry: LogEntry);

    fn action(&self, message: &str) {
        self.append(LogEntry::Action(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.append(LogEntry::Error(message.to_string()));
    }
}

impl<L: ActivityLog + ?Sized> ActivityLog for Arc<L> {
    fn append(&self, entry: LogEntry) {
        (**self).append(entry)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Log file opened once in append mode. Closed when dropped.
pub struct FileLog {
    path: PathBuf,
    timestamps: bool,
    writer: Mutex<LineWriter<File>>,
}

impl FileLog {
    pub fn open(path: impl AsRef<Path>, timestamps: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ManagerError::LogOpen {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Activity log opened: {}", path.display());

        Ok(Self {
            path,
            timestamps,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, entry: &LogEntry) -> String {
        if self.timestamps {
            format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S,%3f"), entry)
        } else {
            entry.to_string()
        }
    }
}

impl ActivityLog for FileLog {
    fn append(&self, entry: LogEntry) {
        let line = self.render(&entry);
        let mut writer = lock(&self.writer);
        if let Err(e) = writeln!(writer, "{}", line) {
            tracing::error!("Failed to write activity log {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        let _ = lock(&self.writer).flush();
    }
}

/// In-process log, for front-ends that show history and for tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.entries).clone()
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.is_error())
            .cloned()
            .collect()
    }
}

impl ActivityLog for MemoryLog {
    fn append(&self, entry: LogEntry) {
        lock(&self.entries).push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn error_lines_are_prefixed() {
        assert_eq!(LogEntry::Action("Connected".into()).to_string(), "Connected");
        assert_eq!(
            LogEntry::Error("Failed to scan devices".into()).to_string(),
            "ERROR: Failed to scan devices"
        );
    }

    #[test]
    fn file_log_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluetooth_manager.log");

        {
            let log = FileLog::open(&path, false).unwrap();
            log.action("Bluetooth Manager started");
            log.error("Failed to scan devices: boom");
        }
        {
            let log = FileLog::open(&path, false).unwrap();
            log.action("Bluetooth Manager started");
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            concat!(
                "Bluetooth Manager started\n",
                "ERROR: Failed to scan devices: boom\n",
                "Bluetooth Manager started\n",
            )
        );
    }

    #[test]
    fn timestamps_precede_the_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bluetooth_manager.log");

        let log = FileLog::open(&path, true).unwrap();
        log.error("oops");
        drop(log);

        let content = fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.ends_with(" ERROR: oops"));
        assert_eq!(line.len(), "2024-01-01 00:00:00,000 ERROR: oops".len());
    }

    #[test]
    fn unopenable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("bluetooth_manager.log");
        assert!(matches!(
            FileLog::open(&path, false),
            Err(ManagerError::LogOpen { .. })
        ));
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryLog::new();
        log.action("first");
        log.error("second");
        log.action("third");

        let messages: Vec<_> = log.entries().iter().map(|e| e.message().to_string()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(log.errors(), vec![LogEntry::Error("second".into())]);
    }
}
