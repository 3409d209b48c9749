//! Append-only JSON Lines mirror of the session history.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, File, OpenOptions};

use crate::error::RewriteError;

use super::HistoryEntry;

/// Appends history entries to a file, one JSON object per line.
#[derive(Debug)]
pub struct HistoryLog {
    path: Utf8PathBuf,
    file: File,
}

impl HistoryLog {
    /// Opens `path` for appending, creating it and its parent directories
    /// when needed.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] when the directory or file cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, RewriteError> {
        let file = open_append_with_parents(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Appends one entry as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] when serialisation or the write fails.
    pub fn append(&mut self, entry: &HistoryEntry) -> Result<(), RewriteError> {
        let line = serde_json::to_string(entry).map_err(|error| RewriteError::Io {
            message: format!("failed to serialise history entry: {error}"),
        })?;
        writeln!(self.file, "{line}").map_err(|error| RewriteError::Io {
            message: format!("failed to append history line '{}': {error}", self.path),
        })?;
        self.file.flush().map_err(|error| RewriteError::Io {
            message: format!("failed to flush history log '{}': {error}", self.path),
        })
    }

    /// Returns the log path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

fn open_append_with_parents(path: &Utf8Path) -> Result<File, RewriteError> {
    let file_name = path.file_name().ok_or_else(|| RewriteError::Io {
        message: format!("invalid history log path '{path}': no file name"),
    })?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };

    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|error| {
        RewriteError::Io {
            message: format!("failed to create history directory '{parent}': {error}"),
        }
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        RewriteError::Io {
            message: format!("failed to open history directory '{parent}': {error}"),
        }
    })?;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    dir.open_with(file_name, &options)
        .map_err(|error| RewriteError::Io {
            message: format!("failed to open history log '{path}': {error}"),
        })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::HistoryLog;
    use crate::history::HistoryEntry;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn entry(original: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
                .single()
                .unwrap_or_default(),
            tone: "formal".to_owned(),
            language: "English".to_owned(),
            original: original.to_owned(),
            rewritten: "Rewritten".to_owned(),
            source_model: "model-a".to_owned(),
            succeeded: true,
        }
    }

    #[test]
    fn append_writes_one_json_line_per_entry_across_reopens() -> TestResult {
        let temp_dir = TempDir::new()?;
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
            .map_err(|path| format!("non UTF-8 temp path: {}", path.display()))?;
        let path = root.join("nested").join("history.jsonl");

        let mut log = HistoryLog::open(&path)?;
        log.append(&entry("first"))?;
        drop(log);
        let mut reopened = HistoryLog::open(&path)?;
        reopened.append(&entry("second"))?;

        let contents = std::fs::read_to_string(reopened.path())?;
        let originals: Vec<String> = contents
            .lines()
            .map(serde_json::from_str::<HistoryEntry>)
            .map(|parsed| parsed.map(|value| value.original))
            .collect::<Result<_, _>>()?;
        assert_eq!(originals, vec!["first".to_owned(), "second".to_owned()]);
        Ok(())
    }

    #[test]
    fn parent_relative_path_is_created_outside_working_directory() -> TestResult {
        let temp_dir = TempDir::new()?;
        let target = Utf8PathBuf::from_path_buf(temp_dir.path().join("logs").join("history.jsonl"))
            .map_err(|path| format!("non UTF-8 temp path: {}", path.display()))?;
        let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
            .map_err(|path| format!("non UTF-8 working directory: {}", path.display()))?;
        let depth = cwd.components().skip(1).count();
        let absolute_tail = target.strip_prefix("/")?;
        let relative: Utf8PathBuf = std::iter::repeat_n("..", depth)
            .map(Utf8PathBuf::from)
            .chain(std::iter::once(absolute_tail.to_path_buf()))
            .collect();
        assert!(relative.starts_with(".."));

        let mut log = HistoryLog::open(&relative)?;
        log.append(&entry("escaped"))?;

        let contents = std::fs::read_to_string(&target)?;
        assert!(contents.contains("\"original\":\"escaped\""));
        Ok(())
    }
}
