//! Template-based exporter using Jinja2-compatible syntax.
//!
//! Templates receive:
//!
//! - `generated_at`: RFC 3339 timestamp of when the export was produced
//! - `entries`: list of rewrites, each with `timestamp`, `tone`, `language`,
//!   `original`, `rewritten`, `source` and `status` (`generated` or
//!   `fallback`)

use std::io::Write;

use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::RewriteError;
use crate::history::HistoryEntry;

use super::io_error;

const TEMPLATE_NAME: &str = "export";

/// Entry data exposed to templates.
#[derive(Debug, Serialize)]
struct TemplateEntry<'a> {
    timestamp: String,
    tone: &'a str,
    language: &'a str,
    original: &'a str,
    rewritten: &'a str,
    source: &'a str,
    status: &'static str,
}

impl<'a> From<&'a HistoryEntry> for TemplateEntry<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_rfc3339(),
            tone: entry.tone.as_str(),
            language: entry.language.as_str(),
            original: entry.original.as_str(),
            rewritten: entry.rewritten.as_str(),
            source: entry.source_model.as_str(),
            status: if entry.succeeded {
                "generated"
            } else {
                "fallback"
            },
        }
    }
}

fn template_error(error: &minijinja::Error) -> RewriteError {
    RewriteError::Template {
        message: error.to_string(),
    }
}

/// Renders entries through a user-supplied template.
///
/// Output is written verbatim; no HTML escaping is applied.
///
/// # Errors
///
/// Returns [`RewriteError::Template`] if the template has a syntax error or
/// fails to render, and [`RewriteError::Io`] if writing fails.
pub fn write_template<W: Write>(
    writer: &mut W,
    entries: &[HistoryEntry],
    template_content: &str,
    generated_at: DateTime<Utc>,
) -> Result<(), RewriteError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env.add_template(TEMPLATE_NAME, template_content)
        .map_err(|e| template_error(&e))?;

    let template_entries: Vec<TemplateEntry<'_>> = entries.iter().map(TemplateEntry::from).collect();
    let ctx = context! {
        generated_at => generated_at.to_rfc3339(),
        entries => template_entries,
    };

    let rendered = env
        .get_template(TEMPLATE_NAME)
        .and_then(|template| template.render(ctx))
        .map_err(|e| template_error(&e))?;

    writer
        .write_all(rendered.as_bytes())
        .map_err(|e| io_error(&e))?;
    Ok(())
}
