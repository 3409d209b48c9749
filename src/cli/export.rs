//! Session history export for the CLI.
//!
//! Writes the rewrites of the current run to `--export-path` as Markdown,
//! JSONL, or through a user-supplied template.

use std::fs::{self, File};
use std::io::{BufWriter, Write};

use chrono::{DateTime, Utc};
use tactful::export::{write_csv, write_jsonl, write_markdown, write_template};
use tactful::{ExportFormat, HistoryEntry, RewriteError, TactfulConfig};

/// How the session history is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// One of the built-in formats.
    Format(ExportFormat),
    /// Contents of a template file.
    Template(String),
}

/// Resolves the configured export, if any.
///
/// # Errors
///
/// Returns [`RewriteError::Configuration`] for an unsupported format and
/// [`RewriteError::Io`] when the template file cannot be read.
pub fn resolve_export_kind(config: &TactfulConfig) -> Result<Option<ExportKind>, RewriteError> {
    if let Some(template_path) = &config.export_template {
        let content = fs::read_to_string(template_path).map_err(|e| RewriteError::Io {
            message: format!("failed to read template file '{template_path}': {e}"),
        })?;
        return Ok(Some(ExportKind::Template(content)));
    }

    Ok(config.resolve_export_format()?.map(ExportKind::Format))
}

/// A resolved export: what to render and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    kind: ExportKind,
    path: String,
}

impl ExportPlan {
    /// Resolves the configured export, reading any template file.
    ///
    /// The CLI modes call this before the first rewrite.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] for an unsupported format or a
    /// missing `--export-path`, and [`RewriteError::Io`] when the template
    /// file cannot be read.
    pub fn resolve(config: &TactfulConfig) -> Result<Option<Self>, RewriteError> {
        let Some(kind) = resolve_export_kind(config)? else {
            return Ok(None);
        };
        let path = config
            .export_path
            .clone()
            .ok_or_else(|| RewriteError::Configuration {
                message: "export requires an output file (use --export-path)".to_owned(),
            })?;
        Ok(Some(Self { kind, path }))
    }

    /// Writes `entries` to the export path.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created or rendering
    /// fails.
    pub fn write(&self, entries: &[HistoryEntry]) -> Result<(), RewriteError> {
        let path = self.path.as_str();
        let file = File::create(path).map_err(|e| RewriteError::Io {
            message: format!("failed to create output file '{path}': {e}"),
        })?;
        let mut writer = BufWriter::new(file);
        write_export(&mut writer, &self.kind, entries, Utc::now())?;
        writer.flush().map_err(|e| RewriteError::Io {
            message: format!("failed to flush output file: {e}"),
        })?;
        tracing::info!(path, entries = entries.len(), "exported rewrite history");
        Ok(())
    }
}

/// Writes `entries` through `plan`, when an export was requested.
///
/// # Errors
///
/// See [`ExportPlan::write`].
pub fn export_history(plan: Option<&ExportPlan>, entries: &[HistoryEntry]) -> Result<(), RewriteError> {
    plan.map_or(Ok(()), |export| export.write(entries))
}

/// Renders `entries` in the requested form.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_export<W: Write>(
    writer: &mut W,
    kind: &ExportKind,
    entries: &[HistoryEntry],
    generated_at: DateTime<Utc>,
) -> Result<(), RewriteError> {
    match kind {
        ExportKind::Format(ExportFormat::Markdown) => write_markdown(writer, entries, generated_at),
        ExportKind::Format(ExportFormat::Jsonl) => write_jsonl(writer, entries),
        ExportKind::Format(ExportFormat::Csv) => write_csv(writer, entries),
        ExportKind::Template(content) => write_template(writer, entries, content, generated_at),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use tactful::{ExportFormat, HistoryEntry, RewriteError, TactfulConfig};
    use tempfile::TempDir;

    use super::{ExportKind, ExportPlan, export_history, resolve_export_kind, write_export};

    fn entry() -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
            tone: "friendly".to_owned(),
            language: "English".to_owned(),
            original: "bad job".to_owned(),
            rewritten: "Nice try!".to_owned(),
            source_model: "model-a".to_owned(),
            succeeded: true,
        }
    }

    #[rstest]
    fn no_export_configured_resolves_to_none() {
        let kind = resolve_export_kind(&TactfulConfig::default()).expect("should resolve");

        assert_eq!(kind, None);
    }

    #[rstest]
    fn template_file_is_read_into_kind() {
        let dir = TempDir::new().expect("temp dir should be created");
        let template_path = dir.path().join("export.j2");
        std::fs::write(&template_path, "{{ entries | length }}").expect("template written");
        let config = TactfulConfig {
            export_template: Some(template_path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        let kind = resolve_export_kind(&config).expect("should resolve");

        assert_eq!(
            kind,
            Some(ExportKind::Template("{{ entries | length }}".to_owned()))
        );
    }

    #[rstest]
    fn missing_template_file_is_an_io_error() {
        let config = TactfulConfig {
            export_template: Some("/nonexistent/tactful/template.j2".to_owned()),
            ..Default::default()
        };

        let result = resolve_export_kind(&config);

        assert!(matches!(result, Err(RewriteError::Io { .. })));
    }

    #[rstest]
    fn write_export_dispatches_on_kind() {
        let mut buffer = Vec::new();

        write_export(
            &mut buffer,
            &ExportKind::Format(ExportFormat::Jsonl),
            &[entry()],
            Utc::now(),
        )
        .expect("should write export");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("\"rewritten\":\"Nice try!\""));
    }

    #[rstest]
    fn export_history_writes_configured_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let output_path = dir.path().join("history.md");
        let config = TactfulConfig {
            export_format: Some("markdown".to_owned()),
            export_path: Some(output_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let plan = ExportPlan::resolve(&config).expect("export should resolve");

        export_history(plan.as_ref(), &[entry()]).expect("export should succeed");

        let content = std::fs::read_to_string(&output_path).expect("export should be readable");
        assert!(content.starts_with("# Feedback Rewrite History"));
        assert!(content.contains("> Nice try!"));
    }

    #[rstest]
    fn csv_export_writes_spreadsheet_rows() {
        let dir = TempDir::new().expect("temp dir should be created");
        let output_path = dir.path().join("history.csv");
        let config = TactfulConfig {
            export_format: Some("csv".to_owned()),
            export_path: Some(output_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let plan = ExportPlan::resolve(&config).expect("export should resolve");

        export_history(plan.as_ref(), &[entry()]).expect("export should succeed");

        let content = std::fs::read_to_string(&output_path).expect("export should be readable");
        assert!(content.starts_with("timestamp,tone,language,original,rewritten"));
        assert!(content.contains(",bad job,Nice try!,model-a,true\r\n"));
    }

    #[rstest]
    fn resolve_requires_export_path() {
        let config = TactfulConfig {
            export_format: Some("jsonl".to_owned()),
            ..Default::default()
        };

        let result = ExportPlan::resolve(&config);

        assert!(matches!(result, Err(RewriteError::Configuration { .. })));
    }

    #[rstest]
    fn no_plan_writes_nothing() {
        assert_eq!(export_history(None, &[entry()]), Ok(()));
    }
}
