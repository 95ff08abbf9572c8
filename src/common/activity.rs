//! Append-only activity log.
//!
//! The core reports milestones (scan start, phase transitions, completion,
//! removal summaries) through [`ActivityLog`]. Logging is best effort: a sink
//! that cannot write drops the line and the caller carries on.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Sink for timestamped milestone lines
pub trait ActivityLog: Send + Sync {
    fn record(&self, message: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActivityLog;

impl ActivityLog for NullActivityLog {
    fn record(&self, _message: &str) {}
}

/// Appends `[timestamp] message` lines to a text file
#[derive(Debug)]
pub struct FileActivityLog {
    path: PathBuf,
    warned: AtomicBool,
}

impl FileActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            warned: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl ActivityLog for FileActivityLog {
    fn record(&self, message: &str) {
        let line = format_line(chrono::Local::now(), message);
        if let Err(e) = self.append(&line) {
            // Only the first failure is worth a warning; no retries.
            if !self.warned.swap(true, Ordering::Relaxed) {
                tracing::warn!(path = %self.path.display(), error = %e, "activity log unavailable");
            }
        }
    }
}

fn format_line(at: chrono::DateTime<chrono::Local>, message: &str) -> String {
    format!("[{}] {}\n", at.format("%Y-%m-%d %H:%M:%S"), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_line_format() {
        let at = chrono::Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_line(at, "Scan started"), "[2026-03-04 05:06:07] Scan started\n");
    }

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileActivityLog::new(dir.path().join("nested").join("cleaner.log"));
        log.record("first");
        log.record("second");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].ends_with("] second"));
    }

    #[test]
    fn test_unwritable_sink_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let log = FileActivityLog::new(dir.path());
        log.record("dropped");
        log.record("dropped again");
    }
}
