//! Export format selection.

use std::fmt;
use std::str::FromStr;

use crate::error::RewriteError;

/// Supported built-in export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable Markdown.
    Markdown,
    /// Machine-readable JSON Lines (one object per line).
    Jsonl,
    /// Comma-separated values for spreadsheets.
    Csv,
}

impl FromStr for ExportFormat {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "jsonl" | "json-lines" | "jsonlines" => Ok(Self::Jsonl),
            "csv" => Ok(Self::Csv),
            _ => Err(RewriteError::Configuration {
                message: format!(
                    "unsupported export format '{s}': valid options are 'markdown', 'jsonl' or 'csv'"
                ),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Jsonl => write!(f, "jsonl"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ExportFormat;
    use crate::error::RewriteError;

    #[rstest]
    #[case("markdown", ExportFormat::Markdown)]
    #[case("MD", ExportFormat::Markdown)]
    #[case("jsonl", ExportFormat::Jsonl)]
    #[case(" json-lines ", ExportFormat::Jsonl)]
    #[case("jsonlines", ExportFormat::Jsonl)]
    #[case("CSV", ExportFormat::Csv)]
    fn parses_valid_values(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>(), Ok(expected));
    }

    #[rstest]
    #[case("xml")]
    #[case("")]
    fn rejects_invalid_values(#[case] input: &str) {
        let result = input.parse::<ExportFormat>();

        assert!(
            matches!(result, Err(RewriteError::Configuration { ref message }) if message.contains("unsupported export format")),
            "expected configuration error, got {result:?}"
        );
    }

    #[test]
    fn display_matches_canonical_name() {
        assert_eq!(ExportFormat::Markdown.to_string(), "markdown");
        assert_eq!(ExportFormat::Jsonl.to_string(), "jsonl");
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
