//! Output formatting utilities for CLI operations.

use std::io::Write;

use tactful::rewrite::DEGRADED_NOTICE;
use tactful::{Presentation, RewriteError, RewriteResult, present};

/// Writes the user-facing rendering of `result`.
///
/// Degraded results are followed by a visible notice; empty results become a
/// failure notice instead of blank output.
///
/// # Errors
///
/// Returns [`RewriteError::Io`] if writing fails.
pub fn write_result<W: Write>(writer: &mut W, result: &RewriteResult) -> Result<(), RewriteError> {
    match present(result) {
        Presentation::Display {
            text,
            source_model,
            degraded,
        } => {
            writeln!(writer, "{text}").map_err(|e| io_error(&e))?;
            writeln!(writer).map_err(|e| io_error(&e))?;
            if degraded {
                writeln!(writer, "Note: {DEGRADED_NOTICE}").map_err(|e| io_error(&e))
            } else {
                writeln!(writer, "Model: {source_model}").map_err(|e| io_error(&e))
            }
        }
        Presentation::FailureNotice { message } => {
            writeln!(writer, "Rewrite failed: {message}").map_err(|e| io_error(&e))
        }
    }
}

/// Converts an I/O error to a [`RewriteError::Io`].
#[must_use]
pub fn io_error(error: &std::io::Error) -> RewriteError {
    RewriteError::Io {
        message: error.to_string(),
    }
}
