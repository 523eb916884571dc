//! File-based data source.
//!
//! Polls a JSON file holding a merged telemetry snapshot. This is the mock
//! data mode: a file with `{line, plc, events}` stands in for the backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{TelemetrySnapshot, TelemetrySource};

/// A data source that reads telemetry snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<TelemetrySnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl TelemetrySource for FileSource {
    fn poll(&mut self) -> Option<TelemetrySnapshot> {
        let current_modified = self.get_modified_time();

        // Check if file has been modified since last read
        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(snapshot) = self.read_file() {
                self.last_modified = current_modified;
                return Some(snapshot);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "line": {"state": "RUNNING", "e_stop_active": false, "fault_active": false},
            "plc": {"status": "SIMULATION"},
            "events": [
                {"id": 1, "kind": "SAFETY", "created_at": 1700000000000, "message": "test"}
            ]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/telemetry.json");
        assert_eq!(source.path(), Path::new("/tmp/telemetry.json"));
        assert_eq!(source.description(), "file: /tmp/telemetry.json");
        assert!(source.error().is_none());
        assert!(source.commander().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        // First poll should return data
        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.line.unwrap().state, "RUNNING");
        assert_eq!(snapshot.events.unwrap().len(), 1);

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/telemetry.json");

        let snapshot = source.poll();
        assert!(snapshot.is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.poll();
        assert!(snapshot.is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_partial_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"plc": {{"status": "OFFLINE"}}}}"#).unwrap();

        let mut source = FileSource::new(file.path());

        // Missing slices stay None; the present one decodes.
        let snapshot = source.poll().unwrap();
        assert!(snapshot.line.is_none());
        assert!(snapshot.events.is_none());
        assert!(snapshot.plc.is_some());
    }
}
