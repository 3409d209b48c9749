//! Batch rewrite mode for feedback items read from `--input-file`.
//!
//! Items are separated by one or more blank lines. Each item is rewritten
//! independently with the same tone and language.

use std::fs;
use std::io::{self, Write};

use tactful::{RewriteError, RewritePipeline, TactfulConfig};

use super::export::{ExportPlan, export_history};
use super::output::{io_error, write_result};
use super::session::Session;

/// Runs batch rewrite mode.
///
/// # Errors
///
/// Returns an error if the input file is missing, unreadable, or contains no
/// feedback, if configuration is invalid, or if writing output fails.
pub fn run(config: &TactfulConfig) -> Result<(), RewriteError> {
    let input_path = config.require_input_file()?;
    let content = fs::read_to_string(input_path).map_err(|e| RewriteError::Io {
        message: format!("failed to read input file '{input_path}': {e}"),
    })?;
    let pipeline = RewritePipeline::from_config(config)?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    run_with_pipeline(&mut writer, config, &pipeline, &content)
}

/// Runs batch rewrite mode over `content` against an explicit pipeline.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_pipeline<W: Write>(
    writer: &mut W,
    config: &TactfulConfig,
    pipeline: &RewritePipeline,
    content: &str,
) -> Result<(), RewriteError> {
    let items = split_items(content);
    if items.is_empty() {
        return Err(RewriteError::EmptyInput);
    }
    let requests = items
        .iter()
        .map(|item| config.rewrite_request(item))
        .collect::<Result<Vec<_>, _>>()?;

    let export = ExportPlan::resolve(config)?;
    let mut session = Session::open(config, pipeline)?;
    let total = requests.len();
    for (index, request) in requests.iter().enumerate() {
        if index > 0 {
            writeln!(writer).map_err(|e| io_error(&e))?;
        }
        writeln!(writer, "=== {}/{total} ===", index + 1).map_err(|e| io_error(&e))?;
        let result = session.submit(request);
        write_result(writer, &result)?;
    }

    export_history(export.as_ref(), session.history().entries())
}

/// Splits `content` into feedback items separated by blank lines.
///
/// Lines within an item keep their line breaks; surrounding whitespace is
/// trimmed.
#[must_use]
pub fn split_items(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            push_item(&mut items, &mut current);
        } else {
            current.push(line);
        }
    }
    push_item(&mut items, &mut current);

    items
}

fn push_item(items: &mut Vec<String>, current: &mut Vec<&str>) {
    if current.is_empty() {
        return;
    }
    items.push(current.join("\n").trim().to_owned());
    current.clear();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rstest::rstest;
    use tactful::rewrite::test_support::{RecordingBackoff, ScriptedBackend};
    use tactful::{CandidateList, RewriteError, RewritePipeline, TactfulConfig};

    use super::{run_with_pipeline, split_items};

    #[rstest]
    #[case::single("bad job", vec!["bad job"])]
    #[case::two_items("bad job\n\nterrible", vec!["bad job", "terrible"])]
    #[case::multi_line_item("line one\nline two\n\n\n  next  \n", vec!["line one\nline two", "next"])]
    #[case::whitespace_separators("a\n   \nb", vec!["a", "b"])]
    #[case::empty("\n \n", vec![])]
    fn splits_on_blank_lines(#[case] content: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_items(content), expected);
    }

    #[rstest]
    fn rewrites_every_item_in_order() {
        let backend = Arc::new(ScriptedBackend::new().succeed("model-a", "Polished"));
        let pipeline = RewritePipeline::new(
            CandidateList::parse("model-a", Duration::from_secs(5)).expect("candidates parse"),
        )
        .with_backend(backend.clone())
        .with_backoff(Arc::new(RecordingBackoff::default()));
        let mut buffer = Vec::new();

        run_with_pipeline(
            &mut buffer,
            &TactfulConfig::default(),
            &pipeline,
            "bad job\n\nterrible",
        )
        .expect("batch should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.starts_with("=== 1/2 ===\nPolished\n"));
        assert!(output.contains("\n=== 2/2 ===\nPolished\n"));
        let prompts = backend.prompts();
        let originals: Vec<&str> = prompts.iter().map(|prompt| prompt.user.as_str()).collect();
        assert_eq!(originals, vec!["bad job", "terrible"]);
    }

    #[rstest]
    fn empty_file_is_rejected() {
        let pipeline = RewritePipeline::new(
            CandidateList::parse("model-a", Duration::from_secs(5)).expect("candidates parse"),
        );
        let mut buffer = Vec::new();

        let result = run_with_pipeline(&mut buffer, &TactfulConfig::default(), &pipeline, "\n\n");

        assert_eq!(result, Err(RewriteError::EmptyInput));
        assert!(buffer.is_empty());
    }

    #[rstest]
    fn unsupported_export_format_fails_before_any_attempt() {
        let backend = Arc::new(ScriptedBackend::new().succeed("model-a", "Polished"));
        let pipeline = RewritePipeline::new(
            CandidateList::parse("model-a", Duration::from_secs(5)).expect("candidates parse"),
        )
        .with_backend(backend.clone());
        let config = TactfulConfig {
            export_format: Some("xml".to_owned()),
            export_path: Some("history.xml".to_owned()),
            ..Default::default()
        };
        let mut buffer = Vec::new();

        let result = run_with_pipeline(&mut buffer, &config, &pipeline, "bad job\n\nterrible");

        assert!(matches!(result, Err(RewriteError::Configuration { .. })));
        assert!(backend.calls().is_empty());
        assert!(buffer.is_empty());
    }
}
