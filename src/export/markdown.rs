//! Markdown formatter for history entries.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::RewriteError;
use crate::history::HistoryEntry;

use super::io_error;

/// Writes entries as a Markdown document.
///
/// Each rewrite gets its own section with the tone, language and source
/// model, followed by the original and rewritten text as block quotes.
///
/// # Errors
///
/// Returns [`RewriteError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(
    writer: &mut W,
    entries: &[HistoryEntry],
    generated_at: DateTime<Utc>,
) -> Result<(), RewriteError> {
    writeln!(writer, "# Feedback Rewrite History").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "Generated: {}", generated_at.to_rfc3339()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for (index, entry) in entries.iter().enumerate() {
        write_entry_section(writer, index + 1, entry)?;
    }

    Ok(())
}

fn write_entry_section<W: Write>(
    writer: &mut W,
    number: usize,
    entry: &HistoryEntry,
) -> Result<(), RewriteError> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "## {number}. {} ({})",
        entry.tone, entry.language
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    let status = if entry.succeeded { "" } else { " (degraded)" };
    writeln!(
        writer,
        "*{}* via `{}`{status}",
        entry.timestamp.to_rfc3339(),
        entry.source_model
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    writeln!(writer, "**Original**").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    write_quote(writer, entry.original.as_str())?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Rewritten**").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    write_quote(writer, entry.rewritten.as_str())?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes `text` as a block quote, preserving blank lines.
fn write_quote<W: Write>(writer: &mut W, text: &str) -> Result<(), RewriteError> {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(writer, ">").map_err(|e| io_error(&e))?;
        } else {
            writeln!(writer, "> {line}").map_err(|e| io_error(&e))?;
        }
    }
    Ok(())
}
