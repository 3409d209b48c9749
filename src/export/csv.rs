//! CSV formatter for history entries.

use std::io::Write;

use crate::error::RewriteError;
use crate::history::HistoryEntry;

use super::io_error;

const HEADER: [&str; 7] = [
    "timestamp",
    "tone",
    "language",
    "original",
    "rewritten",
    "source_model",
    "succeeded",
];

/// Writes entries as comma-separated values with a header row.
///
/// Fields containing a comma, double quote, or line break are quoted, with
/// embedded quotes doubled. Rows end with CRLF.
///
/// # Errors
///
/// Returns [`RewriteError::Io`] if writing to the output fails.
pub fn write_csv<W: Write>(writer: &mut W, entries: &[HistoryEntry]) -> Result<(), RewriteError> {
    write_row(writer, &HEADER)?;
    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339();
        let succeeded = entry.succeeded.to_string();
        write_row(
            writer,
            &[
                timestamp.as_str(),
                entry.tone.as_str(),
                entry.language.as_str(),
                entry.original.as_str(),
                entry.rewritten.as_str(),
                entry.source_model.as_str(),
                succeeded.as_str(),
            ],
        )?;
    }
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> Result<(), RewriteError> {
    let row = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    write!(writer, "{row}\r\n").map_err(|e| io_error(&e))
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
