//! JSONL (JSON Lines) formatter for history entries.

use std::io::Write;

use crate::error::RewriteError;
use crate::history::HistoryEntry;

use super::io_error;

/// Writes entries in JSONL format, one object per line.
///
/// # Errors
///
/// Returns [`RewriteError::Io`] if serialisation or writing fails.
pub fn write_jsonl<W: Write>(writer: &mut W, entries: &[HistoryEntry]) -> Result<(), RewriteError> {
    for entry in entries {
        serde_json::to_writer(&mut *writer, entry).map_err(|e| RewriteError::Io {
            message: format!("JSON serialization failed: {e}"),
        })?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}
