//! Session history export.
//!
//! Rewrites recorded during a session can be exported for later reference:
//!
//! - **Markdown**: one section per rewrite, original and rewritten side by side
//! - **JSONL**: one JSON object per line for downstream tooling
//! - **CSV**: one row per rewrite for spreadsheets
//! - **Template**: a user-supplied Jinja2 template rendered with `minijinja`

mod csv;
mod jsonl;
mod markdown;
mod model;
mod template;

pub use csv::write_csv;
pub use jsonl::write_jsonl;
pub use markdown::write_markdown;
pub use model::ExportFormat;
pub use template::write_template;

use crate::error::RewriteError;

/// Converts an I/O error to a [`RewriteError::Io`].
fn io_error(error: &std::io::Error) -> RewriteError {
    RewriteError::Io {
        message: error.to_string(),
    }
}
